//! Error types for hvctl
//!
//! All modules use `HvResult<T>` as their return type.

use crate::inventory::CacheState;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hvctl operations
pub type HvResult<T> = Result<T, HvError>;

/// All errors that can occur in hvctl
#[derive(Error, Debug)]
pub enum HvError {
    // Inventory errors
    #[error("Inventory cache at {path} is corrupt: {reason}")]
    CorruptCache { path: PathBuf, reason: String },

    #[error("Failed to persist inventory cache to {path}: {source}")]
    CachePersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        /// Merged state that could not be written, still valid for this invocation
        unsaved: Option<Box<CacheState>>,
    },

    #[error("No such machine: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Remote errors
    #[error("No Hyper-V host configured")]
    HostNotConfigured,

    #[error("ssh client not found in PATH")]
    SshNotFound,

    #[error("Remote command failed: {command}: {stderr}")]
    RemoteCommand { command: String, stderr: String },

    #[error("Unexpected response from Hyper-V host: {0}")]
    RemoteParse(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl HvError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a cache persistence error with no merged state attached
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CachePersist {
            path: path.into(),
            source,
            unsaved: None,
        }
    }

    /// Create a remote command error
    pub fn remote(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::RemoteCommand {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CorruptCache { .. } => Some("Run: hvctl ls (rebuilds the cache)"),
            Self::CachePersist { .. } => Some("Check permissions on the cache directory"),
            Self::NotFound(_) => Some("Run: hvctl ls to refresh machine indexes"),
            Self::InvalidArgument(_) => Some("Address a machine by INDEX or by --name NAME"),
            Self::HostNotConfigured => {
                Some("Pass --host or run: hvctl config set server.host <address>")
            }
            Self::SshNotFound => Some("Install an OpenSSH client"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = HvError::NotFound("index 3".to_string());
        assert_eq!(err.to_string(), "No such machine: index 3");
    }

    #[test]
    fn error_hint() {
        let err = HvError::HostNotConfigured;
        assert!(err.hint().unwrap().contains("server.host"));
        assert!(HvError::User("x".into()).hint().is_none());
    }

    #[test]
    fn persist_has_no_unsaved_state() {
        let err = HvError::persist(
            "/tmp/x.json",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, HvError::CachePersist { unsaved: None, .. }));
    }
}
