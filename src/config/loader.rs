// Configuration loader
// Loads settings from --config <path> or ~/.crtterm/config.toml, defaults otherwise

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::APP_DIR;
use super::settings::Config;

/// Load configuration.
///
/// An explicit path must exist. Without one, ~/.crtterm/config.toml is used
/// when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => load_from_path(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_from_path(&path)?,
            _ => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Parse a TOML document into a config; missing keys take their defaults
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).context("Failed to parse configuration")
}

fn load_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    parse_config(&contents).with_context(|| format!("Invalid config file: {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join("config.toml"))
}
