// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
mod settings;
pub mod themes;

pub use loader::{load_config, parse_config};
pub use settings::{
    ApiConfig, CartridgeEntry, Config, InputModality, Layout, ProfileConfig, TerminalConfig,
};
pub use themes::{find_theme, Theme, THEMES};
