// crtterm - retro CRT terminal widget
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crtterm::cli::{check_assets, Repl};
use crtterm::config::{load_config, InputModality};
use crtterm::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "crtterm")]
#[command(
    about = "A retro CRT terminal with a command shell and media cartridges",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.crtterm/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Skip the boot sequence
    #[arg(long)]
    no_boot: bool,

    /// Touch input: the caret is always drawn at the end of the line
    #[arg(long)]
    touch: bool,

    /// Start with this theme
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
}

fn load(cli: &Cli) -> Result<crtterm::config::Config> {
    let mut config = load_config(cli.config.as_deref())?;

    if cli.no_boot {
        config.terminal.boot = false;
    }
    if cli.touch {
        config.terminal.modality = InputModality::Touch;
    }
    if let Some(theme) = &cli.theme {
        config.active_theme = theme.to_lowercase();
    }
    config.validate().context("Invalid command-line override")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = config.state_dir() {
        if let Err(e) = init_logging(&dir) {
            eprintln!("Warning: {:#}", e);
        }
    }

    if let Err(e) = check_assets(&config) {
        tracing::error!("{}", e);
        eprintln!("{}", e.fatal_notice());
        return ExitCode::FAILURE;
    }

    match Repl::new(config).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
