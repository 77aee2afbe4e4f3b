use std::process::exit;

use clap::Parser;
use console::style;
use log::{debug, info};

use diaglab::{App, Cli, Config, DiaglabError, Result};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");

    if let Err(e) = run(cli).await {
        if already_reported(&e) {
            debug!("Command failed: {}", e);
        } else {
            eprintln!("{} {}", style("error:").red().bold(), e);
        }
        exit(1);
    }

    info!("Application shutting down");
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_init(&config_path)?;

    // Command-line overrides beat the stored configuration
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(auth_url) = cli.auth_url {
        config.auth_url = auth_url;
    }

    let mut app = App::new(config, config_path, cli.verbose);
    app.run(cli.command).await
}

/// Whether the failure already reached the user through a notification,
/// making a second stderr line redundant.
fn already_reported(error: &DiaglabError) -> bool {
    error.is_remote() || matches!(error, DiaglabError::Validation { .. })
}
