//! Document storage configuration.

pub use ecclesia_shared::StorageProvider;

/// Document store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend.
    pub provider: StorageProvider,
    /// Top-level folder of every generated document.
    pub key_prefix: String,
}

impl StorageConfig {
    /// Folder the receipts and declarations are filed under.
    pub const DEFAULT_KEY_PREFIX: &'static str = "receipts";

    /// Creates a configuration with the default key prefix.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            key_prefix: Self::DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Overrides the key prefix.
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.key_prefix, "receipts");

        let config = config.with_key_prefix("archive");
        assert_eq!(config.key_prefix, "archive");
    }
}
