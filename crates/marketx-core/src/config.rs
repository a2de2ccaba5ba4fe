use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MarketxError;


/// Top-level Market X configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

/// General site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for `marketx.log`. Unset = console only.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// TOML file replacing the bundled translation table. Unset = bundled.
    #[serde(default)]
    pub translations: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_dir: None,
            translations: None,
        }
    }
}

/// Gold price feed, fetched at startup and then on a fixed interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_feed_url")]
    pub url: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Per-request timeout in seconds. 0 = no timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_feed_url(),
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Date/time card next to the price feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// `chrono` format for the date slot (default: `DD/MM/YYYY`).
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// `chrono` format for the live time slot (default: 12-hour `HH:MM AM`).
    #[serde(default = "default_time_format")]
    pub time_format: String,
    /// Fixed "posted at" label; never changes while running.
    #[serde(default = "default_posted_time")]
    pub posted_time: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            posted_time: default_posted_time(),
        }
    }
}

/// Cosmetic page effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default = "default_true")]
    pub typewriter: bool,
    /// Delay between typed characters in milliseconds.
    #[serde(default = "default_typewriter_ms")]
    pub typewriter_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            typewriter: true,
            typewriter_ms: default_typewriter_ms(),
        }
    }
}

// --- Default value functions ---

fn default_name() -> String {
    "Market X Trader".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_feed_url() -> String {
    "https://script.google.com/macros/s/AKfycbxW_WSe6CtMLPzdvgnWe_V_Uy5BLEinCb9OmylVOwfqR61CawoPmF1bmDn-HRVOyy9V/exec".to_string()
}
fn default_interval_secs() -> u64 {
    60
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}
fn default_time_format() -> String {
    "%I:%M %p".to_string()
}
fn default_posted_time() -> String {
    "9:00 \u{1796}\u{17d2}\u{179a}\u{17b9}\u{1780}".to_string()
}
fn default_typewriter_ms() -> u64 {
    50
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

impl Config {
    /// Reject settings that would make a periodic loop spin.
    pub fn validate(&self) -> Result<(), MarketxError> {
        if self.feed.enabled && self.feed.interval_secs == 0 {
            return Err(MarketxError::Config(
                "feed.interval_secs must be greater than 0".into(),
            ));
        }
        if self.clock.enabled && self.clock.interval_secs == 0 {
            return Err(MarketxError::Config(
                "clock.interval_secs must be greater than 0".into(),
            ));
        }
        if self.effects.typewriter && self.effects.typewriter_ms == 0 {
            return Err(MarketxError::Config(
                "effects.typewriter_ms must be greater than 0".into(),
            ));
        }
        if self.feed.enabled && self.feed.url.trim().is_empty() {
            return Err(MarketxError::Config("feed.url is empty".into()));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, MarketxError> {
    let expanded = shellexpand(path);
    let path = Path::new(&expanded);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| MarketxError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| MarketxError::Config(format!("failed to parse config: {}", e)))?;

    config.validate()?;
    Ok(config)
}
