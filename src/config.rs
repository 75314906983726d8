use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

use crate::engine::IconState;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub icons: IconConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// "sqlite" or "memory".
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IconConfig {
    #[serde(default = "default_icon_base_path")]
    pub base_path: String,
    #[serde(default = "default_blacklisted_icon")]
    pub blacklisted: String,
    #[serde(default = "default_whitelisted_icon")]
    pub whitelisted: String,
    #[serde(default = "default_allowed_icon")]
    pub allowed: String,
    #[serde(default = "default_blocked_icon")]
    pub blocked: String,
    #[serde(default = "default_click_hint")]
    pub click_hint: String,
    #[serde(default = "default_whitelisted_text")]
    pub whitelisted_text: String,
    #[serde(default = "default_blacklisted_text")]
    pub blacklisted_text: String,
}

/// What the toolbar shows for one [`IconState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAppearance {
    pub path: String,
    pub tooltip: String,
}

// Defaults
fn default_storage_backend() -> String {
    "sqlite".to_string()
}
fn default_sqlite_path() -> String {
    "clever-mute.db".to_string()
}
fn default_namespace() -> String {
    "local".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_icon_base_path() -> String {
    "resources/shared/images/".to_string()
}
fn default_blacklisted_icon() -> String {
    "muted_icon_blacklist_128.png".to_string()
}
fn default_whitelisted_icon() -> String {
    "icon_whitelist_128.png".to_string()
}
fn default_allowed_icon() -> String {
    "icon_128.png".to_string()
}
fn default_blocked_icon() -> String {
    "muted_icon_128.png".to_string()
}
fn default_click_hint() -> String {
    "Click to enable/disable website audio".to_string()
}
fn default_whitelisted_text() -> String {
    "This tab audio is whitelisted.\n".to_string()
}
fn default_blacklisted_text() -> String {
    "This tab audio is blacklisted!\n".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            sqlite_path: default_sqlite_path(),
            namespace: default_namespace(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            base_path: default_icon_base_path(),
            blacklisted: default_blacklisted_icon(),
            whitelisted: default_whitelisted_icon(),
            allowed: default_allowed_icon(),
            blocked: default_blocked_icon(),
            click_hint: default_click_hint(),
            whitelisted_text: default_whitelisted_text(),
            blacklisted_text: default_blacklisted_text(),
        }
    }
}

impl IconConfig {
    pub fn appearance(&self, state: IconState) -> IconAppearance {
        let (file, prefix) = match state {
            IconState::Blacklisted => (&self.blacklisted, self.blacklisted_text.as_str()),
            IconState::Whitelisted => (&self.whitelisted, self.whitelisted_text.as_str()),
            IconState::AllowedDefault => (&self.allowed, ""),
            IconState::BlockedDefault => (&self.blocked, ""),
        };

        IconAppearance {
            path: format!("{}{}", self.base_path, file),
            tooltip: format!("{}{}", prefix, self.click_hint),
        }
    }
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config TOML")?;
        Ok(config)
    }
}
