//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::MessageFamily;
use std::path::PathBuf;

/// ITS Publisher - road hazard messages from recorded driving scenes
#[derive(Parser, Debug)]
#[command(
    name = "its-publisher",
    author,
    version,
    about = "Publish ALERT / ADVISORY messages from recorded scene data",
    long_about = "Loads a recorded driving-scene dataset, joins its entity tables into\n\
                  scene facts, assembles ALERT or ADVISORY messages and publishes one\n\
                  message per interval through the configured wire codec."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        env = "ITS_PUBLISHER_VERBOSE"
    )]
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
        env = "ITS_PUBLISHER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load, join, assemble and publish until every message is sent
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Report dataset statistics for a configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "publisher.toml",
        env = "ITS_PUBLISHER_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the entity directory from configuration
    #[arg(long, env = "ITS_PUBLISHER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the published message family
    #[arg(long, value_enum, env = "ITS_PUBLISHER_FAMILY")]
    pub family: Option<FamilyArg>,

    /// Override the tick period in milliseconds
    #[arg(long, env = "ITS_PUBLISHER_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "ITS_PUBLISHER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without publishing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "publisher.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "publisher.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Message family as accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FamilyArg {
    Alert,
    Advisory,
}

impl From<FamilyArg> for MessageFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Alert => MessageFamily::Alert,
            FamilyArg::Advisory => MessageFamily::Advisory,
        }
    }
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
    fn test_run_overrides_parse() {
        let cli = Cli::try_parse_from([
            "its-publisher",
            "-v",
            "run",
            "--config",
            "p.toml",
            "--family",
            "advisory",
            "--interval-ms",
            "250",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.config, PathBuf::from("p.toml"));
        assert_eq!(args.interval_ms, Some(250));
        assert_eq!(
            args.family.map(MessageFamily::from),
            Some(MessageFamily::Advisory)
        );
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["its-publisher", "-q", "-v", "info"]);
        assert!(result.is_err());
    }
}
