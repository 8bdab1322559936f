//! Configuration schema for hvctl
//!
//! Configuration is stored at `~/.config/hvctl/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Hyper-V host connection
    pub server: ServerConfig,

    /// Inventory cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Hyper-V host reached over SSH
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Hostname or IP address of the Hyper-V server
    pub host: Option<String>,

    /// Login user
    pub user: Option<String>,

    /// Windows domain of the user
    pub domain: Option<String>,

    /// SSH port
    pub port: u16,

    /// Extra `-o` options passed to ssh (e.g. "ConnectTimeout=5")
    pub ssh_options: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            domain: None,
            port: 22,
            ssh_options: vec![],
        }
    }
}

/// Inventory cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache file (default: state directory)
    pub file: Option<PathBuf>,

    /// Seconds before the cache is considered stale (0 = always sync)
    pub sync_interval_secs: i64,

    /// Seconds to wait for another process writing the cache
    pub lock_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: None,
            sync_interval_secs: 300,
            lock_timeout_secs: 10,
        }
    }
}
