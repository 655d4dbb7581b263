//! Command implementations.

mod info;
mod replay;
mod validate;

pub use info::run_info;
pub use replay::run_replay;
pub use validate::run_validate;

use anyhow::{Context, Result};
use contracts::RoutingBlueprint;
use std::path::Path;

use crate::error::CliError;

/// Load and validate a routing configuration
pub(crate) fn load_blueprint(path: &Path) -> Result<RoutingBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
