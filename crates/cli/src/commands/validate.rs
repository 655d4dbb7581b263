//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{Channel, RoutingBlueprint, SinkType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    transfer: String,
    chunk_size: usize,
    callback_count: usize,
    object_count: usize,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            let count = |pick: fn(&contracts::ChannelRouting) -> bool| {
                Channel::ALL
                    .iter()
                    .filter(|c| pick(blueprint.channel(**c)))
                    .count()
            };

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    transfer: blueprint.transfer.name.clone(),
                    chunk_size: blueprint.transfer.chunk_size,
                    callback_count: count(|r| r.callback.is_some()),
                    object_count: count(|r| r.object.is_some()),
                    sink_count: blueprint.sinks().len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &RoutingBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    for channel in Channel::ALL {
        let routing = blueprint.channel(channel);
        if let (Some(cb), Some(obj)) = (&routing.callback, &routing.object) {
            warnings.push(format!(
                "{channel}: callback '{}' shadows object sink '{}'",
                cb.name, obj.name
            ));
        }
    }

    if blueprint.header.callback.is_none()
        && blueprint.header.object.is_none()
        && blueprint.body.callback.is_none()
    {
        if let Some(obj) = &blueprint.body.object {
            warnings.push(format!(
                "header: no sink configured, headers will share body object sink '{}'",
                obj.name
            ));
        }
    }

    if blueprint.defaults.body.sink_type == SinkType::Discard {
        warnings.push("defaults.body discards data when no body sink is set".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Transfer: {}", summary.transfer);
            println!("  Chunk size: {}", summary.chunk_size);
            println!("  Callback slots: {}", summary.callback_count);
            println!("  Object slots: {}", summary.object_count);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
