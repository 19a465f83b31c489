// Project-wide constants
//
// Centralised here so storage keys and other magic values have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Durable key holding the submitted command lines (JSON array of strings).
pub const HISTORY_KEY: &str = "cmd_history";

/// Prefix for per-command response cache entries (`api_cache_<name>`).
pub const CACHE_KEY_PREFIX: &str = "api_cache_";

/// Maximum number of history entries kept in memory and in storage.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Default time-to-live for cached API responses.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Upper bound for api.cache_ttl_secs (30 days)
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Request timeout for profile providers. Failures are never retried.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Delay between boot lines.
pub const DEFAULT_BOOT_LINE_DELAY_MS: u64 = 500;

/// Repaint coalescing interval (one frame at ~60 Hz).
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Maximum number of transcript lines kept before the oldest are dropped.
pub const MAX_TRANSCRIPT_LINES: usize = 1000;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_CODEFORCES_API: &str = "https://codeforces.com";

/// Directory under the home directory holding config, state and logs.
pub const APP_DIR: &str = ".crtterm";
