//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Capture file not found
    #[error("Capture file not found: {path}")]
    CaptureNotFound { path: String },

    /// Replay aborted
    #[error("Transfer {index} of {total} aborted: {message}")]
    TransferAborted {
        index: u32,
        total: u32,
        message: String,
    },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn capture_not_found(path: impl Into<String>) -> Self {
        Self::CaptureNotFound { path: path.into() }
    }

    pub fn transfer_aborted(index: u32, total: u32, message: impl Into<String>) -> Self {
        Self::TransferAborted {
            index,
            total,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CliError::capture_not_found("resp.http").to_string(),
            "Capture file not found: resp.http"
        );
        assert_eq!(
            CliError::transfer_aborted(2, 3, "short write").to_string(),
            "Transfer 2 of 3 aborted: short write"
        );
    }
}
