use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{APP_NAME_LOWER, ENV_CONFIG};

#[derive(Parser)]
#[command(name = APP_NAME_LOWER)]
#[command(version, about = "Span metrics connector configuration tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Decode, validate and build every connector in the config (default command)
    Check,
    /// Print the engine configuration each connector translates to
    Convert {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List registered components with their defaults
    Components,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig { config: cli.config };
    (config, cli.command)
}
