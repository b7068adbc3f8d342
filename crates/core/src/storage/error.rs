//! Document storage error types.

use thiserror::Error;

/// Document storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No document under the key.
    #[error("document not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Backend could not be configured.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Backend operation failed.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Key would escape the church folder.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}
