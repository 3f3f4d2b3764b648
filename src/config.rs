use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Debounce window accepted for live suggestions, in milliseconds.
pub const DEBOUNCE_RANGE_MS: std::ops::RangeInclusive<u64> = 300..=350;

const ENV_PREFIX: &str = "FACULTY_FINDER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub suggestions: SuggestionConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the faculty search backend; endpoint paths are joined onto it.
    pub base_url: String,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    /// Inputs shorter than this (after trimming) never produce suggestions.
    pub min_query_chars: usize,
    /// Used when the backend reports a page size of zero.
    pub default_page_size: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SuggestionConfig {
    pub limit: usize,
    /// Ask the suggestions-by-prefix endpoint instead of matching locally.
    pub remote: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub history_capacity: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            request_timeout_seconds: 10,
            user_agent: format!("faculty-finder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_chars: 2,
            default_page_size: 10,
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            remote: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_capacity: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Config {
    /// Reads a TOML file. Missing sections and keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&raw)?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus `FACULTY_FINDER_*` overrides, reading `.env` first when present.
    pub fn from_env() -> ConfigResult<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which receives fully prefixed variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(url) = var("API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("REQUEST_TIMEOUT_SECONDS") {
            self.api.request_timeout_seconds = parse_number("api.request_timeout_seconds", &timeout)?;
        }
        if let Some(debounce) = var("DEBOUNCE_MS") {
            self.search.debounce_ms = parse_number("search.debounce_ms", &debounce)?;
        }
        if let Some(limit) = var("SUGGESTION_LIMIT") {
            self.suggestions.limit = parse_number("suggestions.limit", &limit)?;
        }
        if let Some(remote) = var("REMOTE_SUGGESTIONS") {
            self.suggestions.remote = matches!(remote.trim(), "1" | "true" | "yes" | "on");
        }
        if let Some(dir) = var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !DEBOUNCE_RANGE_MS.contains(&self.search.debounce_ms) {
            return Err(ConfigError::Invalid {
                field: "search.debounce_ms",
                reason: format!(
                    "{} is outside {}..={}",
                    self.search.debounce_ms,
                    DEBOUNCE_RANGE_MS.start(),
                    DEBOUNCE_RANGE_MS.end()
                ),
            });
        }

        if self.search.min_query_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "search.min_query_chars",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.search.default_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "search.default_page_size",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.suggestions.limit == 0 {
            return Err(ConfigError::Invalid {
                field: "suggestions.limit",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.storage.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "storage.history_capacity",
                reason: "must be at least 1".to_string(),
            });
        }

        if let Err(e) = url::Url::parse(&self.api.base_url) {
            warn!(base_url = %self.api.base_url, "Rejecting unparsable API base URL");
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: e.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })
}
