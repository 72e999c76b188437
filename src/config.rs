use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::core::EngineOptions;
use crate::services::{CsvFileFeed, FeedSource, SheetFeed};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub feed: FeedSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub snapshot: SnapshotSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Empty list allows any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Sheet,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    pub source: FeedKind,
    pub sheet_id: Option<String>,
    pub data_tab: Option<String>,
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,
    pub csv_path: Option<String>,
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_feed_base_url() -> String { "https://docs.google.com".to_string() }
fn default_feed_timeout_secs() -> u64 { 30 }

impl FeedSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the configured feed provider
    pub fn build_source(&self) -> Result<FeedSource, ConfigError> {
        match self.source {
            FeedKind::Sheet => {
                let sheet_id = self.sheet_id.clone().ok_or_else(|| missing("feed.sheet_id"))?;
                let data_tab = self.data_tab.clone().ok_or_else(|| missing("feed.data_tab"))?;
                let feed = SheetFeed::new(self.base_url.clone(), sheet_id, data_tab, self.timeout())
                    .map_err(|e| ConfigError::Message(format!("failed to build feed client: {}", e)))?;
                Ok(FeedSource::Sheet(feed))
            }
            FeedKind::File => {
                let path = self.csv_path.clone().ok_or_else(|| missing("feed.csv_path"))?;
                Ok(FeedSource::File(CsvFileFeed::new(path)))
            }
        }
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::NotFound(key.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_entries: default_cache_max_entries(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 { 120 }
fn default_cache_max_entries() -> u64 { 64 }

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_strict_match_ids")]
    pub strict_match_ids: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            strict_match_ids: default_strict_match_ids(),
        }
    }
}

fn default_strict_match_ids() -> bool { true }

impl From<&EngineSettings> for EngineOptions {
    fn from(settings: &EngineSettings) -> Self {
        EngineOptions {
            strict_match_ids: settings.strict_match_ids,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotSettings {
    #[serde(default = "default_snapshot_dir")]
    pub dir: String,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            dir: default_snapshot_dir(),
        }
    }
}

fn default_snapshot_dir() -> String { "data".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LEAGUE)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LEAGUE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LEAGUE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"
                [server]
                host = "127.0.0.1"
                port = 8000

                [feed]
                source = "file"
                csv_path = "data/results.csv"
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(settings.feed.source, FeedKind::File);
        assert_eq!(settings.feed.base_url, "https://docs.google.com");
        assert_eq!(settings.cache.ttl_secs, 120);
        assert!(settings.engine.strict_match_ids);
        assert_eq!(settings.snapshot.dir, "data");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_sheet_feed_requires_sheet_id() {
        let feed = FeedSettings {
            source: FeedKind::Sheet,
            sheet_id: None,
            data_tab: Some("Game Data".to_string()),
            base_url: default_feed_base_url(),
            csv_path: None,
            timeout_secs: 5,
        };

        assert!(matches!(feed.build_source(), Err(ConfigError::NotFound(key)) if key == "feed.sheet_id"));
    }

    #[test]
    fn test_file_feed_from_settings() {
        let feed = FeedSettings {
            source: FeedKind::File,
            sheet_id: None,
            data_tab: None,
            base_url: default_feed_base_url(),
            csv_path: Some("data/results.csv".to_string()),
            timeout_secs: 5,
        };

        assert!(matches!(feed.build_source(), Ok(FeedSource::File(_))));
    }

    #[test]
    fn test_engine_options_from_settings() {
        let options = EngineOptions::from(&EngineSettings { strict_match_ids: false });
        assert!(!options.strict_match_ids);
    }
}
