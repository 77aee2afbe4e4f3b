use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    author = "diaglab maintainers <support@diaglab.dev>",
    version,
    about = "Terminal client for the diaglab diagram-generation service"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Override the diagram service base URL
    #[clap(long, value_parser)]
    pub api_url: Option<String>,

    /// Override the authentication service base URL
    #[clap(long, value_parser)]
    pub auth_url: Option<String>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the diaglab application
    #[clap(subcommand)]
    pub command: Commands,
}
