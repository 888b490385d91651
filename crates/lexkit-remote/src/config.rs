//! Remote service configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for the game-database REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTablesConfig {
    #[serde(default = "default_xt_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Attempts per chunk request before giving up.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between attempts in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Game ids requested per call when walking the archive.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

/// Settings for the spreadsheet export endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "default_sheets_url")]
    pub base_url: String,
}

/// Top-level lexkit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexkitConfig {
    #[serde(default)]
    pub crosstables: CrossTablesConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
}

fn default_xt_url() -> String {
    "https://cross-tables.com/rest".to_string()
}
fn default_user_agent() -> String {
    format!("lexkit/{}", env!("CARGO_PKG_VERSION"))
}
fn default_retries() -> u32 {
    10
}
fn default_retry_delay() -> u64 {
    5000
}
fn default_timeout() -> u64 {
    30
}
fn default_chunk_size() -> u64 {
    1000
}
fn default_sheets_url() -> String {
    "https://docs.google.com".to_string()
}

impl Default for CrossTablesConfig {
    fn default() -> Self {
        Self {
            base_url: default_xt_url(),
            user_agent: default_user_agent(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            timeout_secs: default_timeout(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl CrossTablesConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_sheets_url(),
        }
    }
}

/// Starter file written by `lexkit init`.
pub const SAMPLE_CONFIG: &str = r#"# lexkit configuration

[crosstables]
base_url = "https://cross-tables.com/rest"
# user_agent = "${LEXKIT_USER_AGENT}"
max_retries = 10
retry_delay_ms = 5000
timeout_secs = 30
chunk_size = 1000

[sheets]
base_url = "https://docs.google.com"
"#;

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + len]).unwrap_or_default();
        result.replace_range(start..start + len + 1, &value);
        from = start + value.len();
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `lexkit.toml` in the current directory
/// 2. `~/.config/lexkit/config.toml`
///
/// Environment variable overrides: `LEXKIT_XT_BASE_URL`, `LEXKIT_SHEETS_BASE_URL`.
pub fn load_config() -> Result<LexkitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LexkitConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("lexkit.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LexkitConfig::default(),
    };

    if let Ok(url) = std::env::var("LEXKIT_XT_BASE_URL") {
        config.crosstables.base_url = url;
    }
    if let Ok(url) = std::env::var("LEXKIT_SHEETS_BASE_URL") {
        config.sheets.base_url = url;
    }
    Ok(config)
}

/// Parse TOML config text and resolve `${VAR}` references.
pub fn parse_config(content: &str) -> Result<LexkitConfig> {
    let mut config: LexkitConfig = toml::from_str(content)?;
    config.crosstables.base_url = resolve_env_vars(&config.crosstables.base_url);
    config.crosstables.user_agent = resolve_env_vars(&config.crosstables.user_agent);
    config.sheets.base_url = resolve_env_vars(&config.sheets.base_url);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lexkit"))
}
