//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// outroute - route HTTP response body and headers to configured sinks
#[derive(Parser, Debug)]
#[command(
    name = "outroute",
    author,
    version,
    about = "Replay HTTP responses through body/header output routing",
    long_about = "Routes the body and header streams of an HTTP response to the sinks\n\
                  named in a routing configuration. Callback slots take precedence over\n\
                  object slots; headers fall back to the body's object sink when unset."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "OUTROUTE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "OUTROUTE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a captured HTTP response through the configured routing
    Replay(ReplayArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Show how each channel would be resolved
    Info(InfoArgs),
}

/// Arguments for the `replay` command
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// Path to routing configuration (TOML or JSON); defaults apply when absent
    #[arg(short, long, env = "OUTROUTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Raw HTTP/1.x response capture (status line, headers, blank line, body)
    #[arg(long, env = "OUTROUTE_CAPTURE")]
    pub capture: PathBuf,

    /// Override body chunk size from configuration
    #[arg(long, env = "OUTROUTE_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Number of times to replay the capture with the same routing
    #[arg(long, default_value = "1")]
    pub repeat: u32,

    /// Print the transfer report as JSON on stderr
    #[arg(long)]
    pub json: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "OUTROUTE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "routing.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "routing.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay_args() {
        let cli = Cli::try_parse_from([
            "outroute",
            "replay",
            "--capture",
            "response.http",
            "--chunk-size",
            "512",
            "--repeat",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.capture, PathBuf::from("response.http"));
                assert_eq!(args.chunk_size, Some(512));
                assert_eq!(args.repeat, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["outroute", "-q", "-v", "info"]);
        assert!(result.is_err());
    }
}
