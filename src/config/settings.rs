// Configuration structs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use super::constants::*;
use super::themes::{find_theme, theme_names, DEFAULT_THEME};

/// Owner profile the informational commands are formatted from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// GitHub login used by `projects` and `stats`
    pub github: String,
    /// Codeforces handle used by `cp`
    pub codeforces: String,
    pub kaggle: String,
    pub linkedin: String,
    pub email: String,
    /// Author name as indexed by arXiv search
    pub arxiv_name: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            github: "Prakharprasun".to_string(),
            codeforces: "Prakharprasun".to_string(),
            kaggle: "Prakharprasun".to_string(),
            linkedin: "prakhar-prasun".to_string(),
            email: "prakhar.prasun@proton.me".to_string(),
            arxiv_name: "Prakhar_Prasun".to_string(),
        }
    }
}

/// How the host reports the caret position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputModality {
    /// Full caret tracking: the caret is drawn where the host reports it
    #[default]
    Keyboard,
    /// Reduced fidelity: the caret is always drawn at the end of the text
    Touch,
}

/// Screen class, decides whether a missing visual asset is fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Desktop,
    Compact,
}

/// Terminal behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Prompt printed in front of echoed lines
    pub prompt: String,
    pub history_limit: usize,
    pub modality: InputModality,
    /// Run the boot sequence before accepting input
    pub boot: bool,
    pub boot_line_delay_ms: u64,
    /// Per-character delay of the boot typing animation (0 disables it)
    pub typing_delay_ms: u64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            modality: InputModality::Keyboard,
            boot: true,
            boot_line_delay_ms: DEFAULT_BOOT_LINE_DELAY_MS,
            typing_delay_ms: 0,
        }
    }
}

/// Profile provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub github_base_url: String,
    pub codeforces_base_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            github_base_url: DEFAULT_GITHUB_API.to_string(),
            codeforces_base_url: DEFAULT_CODEFORCES_API.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// A mountable media reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartridgeEntry {
    pub name: String,
    pub url: String,
}

fn default_cartridges() -> Vec<CartridgeEntry> {
    vec![CartridgeEntry {
        name: "demo".to_string(),
        url: "https://www.youtube.com/embed/dQw4w9WgXcQ".to_string(),
    }]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Active colour palette (e.g., "dracula", "catppuccin", "solarized")
    pub active_theme: String,

    /// Screen class for asset-failure handling
    pub layout: Layout,

    /// CRT bezel image; missing file is fatal on desktop layouts
    pub crt_image: Option<PathBuf>,

    /// Where history, cache and logs are kept (default: ~/.crtterm/state)
    pub storage_dir: Option<PathBuf>,

    pub profile: ProfileConfig,
    pub terminal: TerminalConfig,
    pub api: ApiConfig,

    /// Cartridges available to `mount`, first one is the default
    pub cartridges: Vec<CartridgeEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_theme: DEFAULT_THEME.to_string(),
            layout: Layout::Desktop,
            crt_image: None,
            storage_dir: None,
            profile: ProfileConfig::default(),
            terminal: TerminalConfig::default(),
            api: ApiConfig::default(),
            cartridges: default_cartridges(),
        }
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        if find_theme(&self.active_theme).is_none() {
            anyhow::bail!(
                "Unknown theme '{}'. Available: {}",
                self.active_theme,
                theme_names()
            );
        }

        if self.terminal.history_limit == 0 {
            anyhow::bail!("terminal.history_limit must be at least 1");
        }

        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be at least 1");
        }
        if self.api.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            anyhow::bail!(
                "api.cache_ttl_secs is {}, the maximum is {}",
                self.api.cache_ttl_secs,
                MAX_CACHE_TTL_SECS
            );
        }

        let mut seen = HashSet::new();
        for (idx, cartridge) in self.cartridges.iter().enumerate() {
            let name = cartridge.name.trim().to_lowercase();
            if name.is_empty() {
                anyhow::bail!("cartridges[{}] has an empty name", idx);
            }
            if name.contains(char::is_whitespace) {
                anyhow::bail!("Cartridge name '{}' must not contain whitespace", cartridge.name);
            }
            if !seen.insert(name) {
                anyhow::bail!("Duplicate cartridge name '{}'", cartridge.name);
            }
        }

        Ok(())
    }

    /// Resolve the state directory, falling back to ~/.crtterm/state
    pub fn state_dir(&self) -> Option<PathBuf> {
        self.storage_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(APP_DIR).join("state")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let config = Config {
            active_theme: "neon".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("neon"));
        assert!(err.contains("dracula"));
    }

    #[test]
    fn test_zero_history_limit_rejected() {
        let mut config = Config::default();
        config.terminal.history_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_api_timeout_rejected() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }

    #[test]
    fn test_cache_ttl_bounds() {
        let mut config = Config::default();
        config.api.cache_ttl_secs = MAX_CACHE_TTL_SECS;
        assert!(config.validate().is_ok());

        config.api.cache_ttl_secs = 9_223_372_036_854_775;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("cache_ttl_secs"));
    }

    #[test]
    fn test_duplicate_cartridges_rejected() {
        let mut config = Config::default();
        config.cartridges.push(CartridgeEntry {
            name: "DEMO".to_string(),
            url: "https://example.com".to_string(),
        });
        assert!(config.validate().is_err());
    }
}
