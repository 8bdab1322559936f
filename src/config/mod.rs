//! Configuration management for hvctl

pub mod schema;

pub use schema::Config;

use crate::error::{HvError, HvResult};
use crate::inventory::{InventoryStore, StalenessPolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hvctl")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hvctl")
    }

    /// Default location of the inventory cache
    pub fn default_cache_path() -> PathBuf {
        Self::state_dir().join("inventory.json")
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> HvResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> HvResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| HvError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| HvError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> HvResult<()> {
        let content = toml::to_string_pretty(config)?;
        self.write_raw(&content).await?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Write already-serialized TOML to the config file
    pub async fn write_raw(&self, content: &str) -> HvResult<()> {
        self.ensure_config_dir().await?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            HvError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> HvResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| HvError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Resolved inventory cache path
    pub fn cache_path(&self) -> PathBuf {
        self.cache
            .file
            .clone()
            .unwrap_or_else(ConfigManager::default_cache_path)
    }

    /// Inventory store built from the cache settings
    pub fn inventory_store(&self) -> InventoryStore {
        InventoryStore::new(
            self.cache_path(),
            Duration::from_secs(self.cache.lock_timeout_secs),
        )
    }

    /// Staleness policy built from the cache settings
    pub fn staleness_policy(&self) -> StalenessPolicy {
        StalenessPolicy::from_secs(self.cache.sync_interval_secs)
    }
}
