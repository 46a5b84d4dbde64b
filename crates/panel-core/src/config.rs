use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Long-lived access token.  Empty means no bridge: every playback
    /// action becomes a silent no-op.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_entity_id")]
    pub entity_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL of the show catalog JSON document.
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// Append a timestamp query parameter so intermediaries never serve a
    /// stale document.
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between media-player state polls.
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            entity_id: default_entity_id(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            cache_bust: default_cache_bust(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
        }
    }
}

fn default_base_url() -> String {
    "http://homeassistant.local:8123".to_string()
}

fn default_entity_id() -> String {
    "media_player.living_room_tv".to_string()
}

fn default_catalog_url() -> String {
    "http://homeassistant.local:8123/local/tv-shows-catalog.json".to_string()
}

fn default_cache_bust() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    1
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// True when a bridge connection is configured.
    pub fn bridge_configured(&self) -> bool {
        !self.bridge.token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.polling.interval_secs, 1);
        assert!(config.catalog.cache_bust);
        assert!(config.bridge.base_url.starts_with("http://"));
        assert_eq!(config.bridge.entity_id, "media_player.living_room_tv");
        assert!(!config.bridge_configured());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [bridge]
            token = "abc123"
            "#,
        )
        .unwrap();
        assert!(config.bridge_configured());
        assert_eq!(config.bridge.base_url, default_base_url());
        assert_eq!(config.catalog.url, default_catalog_url());
        assert_eq!(config.polling.interval_secs, 1);
    }
}
