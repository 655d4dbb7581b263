//! Configuration validation
//!
//! Rules:
//! - sink names are not empty
//! - `file` sinks carry a `path` parameter
//! - no two file sinks write the same path
//! - 0 < transfer.chunk_size <= 16 MiB

use std::collections::HashMap;

use contracts::{ContractError, RoutingBlueprint, SinkType, TransferSettings};

/// Validate a RoutingBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &RoutingBlueprint) -> Result<(), ContractError> {
    validate_transfer(blueprint)?;
    validate_sink_names(blueprint)?;
    validate_file_sinks(blueprint)?;
    Ok(())
}

/// Validate transfer settings
fn validate_transfer(blueprint: &RoutingBlueprint) -> Result<(), ContractError> {
    if blueprint.transfer.chunk_size == 0 {
        return Err(ContractError::config_validation(
            "transfer.chunk_size",
            "chunk_size must be > 0",
        ));
    }
    if blueprint.transfer.chunk_size > TransferSettings::MAX_CHUNK_SIZE {
        return Err(ContractError::config_validation(
            "transfer.chunk_size",
            format!(
                "chunk_size must be <= {} bytes",
                TransferSettings::MAX_CHUNK_SIZE
            ),
        ));
    }
    Ok(())
}

/// Validate sink names
fn validate_sink_names(blueprint: &RoutingBlueprint) -> Result<(), ContractError> {
    for (label, sink) in blueprint.sinks() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("{label}.name"),
                "sink name cannot be empty",
            ));
        }
    }
    Ok(())
}

/// Validate file sink parameters
fn validate_file_sinks(blueprint: &RoutingBlueprint) -> Result<(), ContractError> {
    let mut seen: HashMap<&str, String> = HashMap::new();
    for (label, sink) in blueprint.sinks() {
        if sink.sink_type != SinkType::File {
            continue;
        }
        let path = sink.params.get("path").map(String::as_str).unwrap_or("");
        if path.is_empty() {
            return Err(ContractError::config_validation(
                format!("{label}.params.path"),
                "file sink requires a 'path' parameter",
            ));
        }
        if let Some(previous) = seen.insert(path, label.clone()) {
            return Err(ContractError::config_validation(
                format!("{label}.params.path"),
                format!("duplicate file path '{path}' (already used by {previous})"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkConfig;

    fn minimal_blueprint() -> RoutingBlueprint {
        let mut bp = RoutingBlueprint::default();
        bp.body.object =
            Some(SinkConfig::new("body_file", SinkType::File).with_param("path", "body.bin"));
        bp.header.callback = Some(SinkConfig::new("header_log", SinkType::Log));
        bp
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut bp = minimal_blueprint();
        bp.transfer.chunk_size = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("chunk_size must be > 0"), "got: {err}");
    }

    #[test]
    fn test_chunk_size_upper_bound() {
        let mut bp = minimal_blueprint();
        bp.transfer.chunk_size = TransferSettings::MAX_CHUNK_SIZE;
        assert!(validate(&bp).is_ok());

        bp.transfer.chunk_size = TransferSettings::MAX_CHUNK_SIZE + 1;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("chunk_size must be <="), "got: {err}");

        bp.transfer.chunk_size = usize::MAX;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_empty_sink_name() {
        let mut bp = minimal_blueprint();
        if let Some(cb) = bp.header.callback.as_mut() {
            cb.name = String::new();
        }
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
        assert!(err.contains("header.callback"), "got: {err}");
    }

    #[test]
    fn test_file_sink_without_path() {
        let mut bp = minimal_blueprint();
        bp.header.object = Some(SinkConfig::new("header_file", SinkType::File));
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("requires a 'path'"), "got: {err}");
    }

    #[test]
    fn test_duplicate_file_path() {
        let mut bp = minimal_blueprint();
        bp.header.object =
            Some(SinkConfig::new("header_file", SinkType::File).with_param("path", "body.bin"));
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("duplicate file path"), "got: {err}");
    }
}
