use crate::constants::{cache, limits};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const ENV_DATABASE_URL: &str = "FLIXDEX_DATABASE_URL";
pub const ENV_CACHE_TIMEOUT_SECONDS: &str = "FLIXDEX_CACHE_TIMEOUT_SECONDS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub cache: CacheConfig,

    pub catalog: CatalogConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/flixdex.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of memoized read results. 0 disables caching.
    pub timeout_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: cache::DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Attempts per insert before a uniqueness collision is reported.
    pub max_insert_attempts: u32,

    pub default_per_page: u64,

    pub max_per_page: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_insert_attempts: limits::MAX_INSERT_ATTEMPTS,
            default_per_page: limits::DEFAULT_PER_PAGE,
            max_per_page: limits::MAX_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 6790,
            cors_allowed_origins: vec![
                "http://localhost:6790".to_string(),
                "http://127.0.0.1:6790".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "flixdex".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// `lookup` is `std::env::var` outside of tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|url| !url.is_empty()) {
            self.general.database_path = url;
        }

        if let Some(raw) = lookup(ENV_CACHE_TIMEOUT_SECONDS) {
            self.cache.timeout_seconds = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CACHE_TIMEOUT_SECONDS} must be a whole number"))?;
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("flixdex").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".flixdex").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.max_insert_attempts == 0 {
            anyhow::bail!("catalog.max_insert_attempts must be > 0");
        }

        if self.catalog.max_per_page == 0 {
            anyhow::bail!("catalog.max_per_page must be > 0");
        }

        if self.catalog.default_per_page == 0
            || self.catalog.default_per_page > self.catalog.max_per_page
        {
            anyhow::bail!(
                "catalog.default_per_page must be between 1 and {}",
                self.catalog.max_per_page
            );
        }

        if self.cache.timeout_seconds > cache::MAX_TIMEOUT_SECONDS {
            anyhow::bail!(
                "cache.timeout_seconds must be at most {}",
                cache::MAX_TIMEOUT_SECONDS
            );
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed max_db_connections");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.timeout_seconds, 300);
        assert_eq!(config.catalog.max_insert_attempts, 10);
        assert_eq!(config.catalog.default_per_page, 10);
        assert_eq!(config.server.port, 6790);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[cache]"));
        assert!(toml_str.contains("[catalog]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            timeout_seconds = 0
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.ttl(), Duration::ZERO);

        assert_eq!(config.catalog.max_per_page, 1000);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| match key {
                ENV_DATABASE_URL => Some("sqlite::memory:".to_string()),
                ENV_CACHE_TIMEOUT_SECONDS => Some(" 15 ".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.general.database_path, "sqlite::memory:");
        assert_eq!(config.cache.timeout_seconds, 15);
    }

    #[test]
    fn test_env_override_rejects_garbage_timeout() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|key| {
            (key == ENV_CACHE_TIMEOUT_SECONDS).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_paging() {
        let mut config = Config::default();
        config.catalog.default_per_page = 2000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.max_insert_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_cache_timeout() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| {
                (key == ENV_CACHE_TIMEOUT_SECONDS).then(|| u64::MAX.to_string())
            })
            .unwrap();
        assert!(config.validate().is_err());

        config.cache.timeout_seconds = cache::MAX_TIMEOUT_SECONDS;
        assert!(config.validate().is_ok());
    }
}
