//! Document store backed by Apache OpenDAL.

use ecclesia_shared::types::ChurchId;
use opendal::{ErrorKind, Operator, services};
use tracing::{debug, warn};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use crate::documents::RenderedDocument;

/// Persists generated documents under `{prefix}/{church_id}/{filename}`.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    operator: Operator,
    config: StorageConfig,
}

impl DocumentStore {
    /// Create a document store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .endpoint(&format!("https://{account}.blob.core.windows.net"))
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Storage key of a church document.
    ///
    /// Format: `{prefix}/{church_id}/{sanitized_filename}`
    #[must_use]
    pub fn receipt_key(&self, church_id: ChurchId, filename: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.key_prefix,
            church_id,
            sanitize_filename(filename)
        )
    }

    /// Writes `document` for `church_id` and returns its key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn store(
        &self,
        church_id: ChurchId,
        document: &RenderedDocument,
    ) -> Result<String, StorageError> {
        let key = self.receipt_key(church_id, &document.filename);
        self.write(&key, document.bytes.clone()).await?;
        Ok(key)
    }

    /// Writes `bytes` under `key` in one call.
    ///
    /// A failed write never leaves a truncated document behind: whatever
    /// reached the backend is deleted before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    pub async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        validate_key(key)?;
        let size = bytes.len();

        match self.operator.write(key, bytes).await {
            Ok(_) => {
                debug!(key = %key, size, provider = self.provider_name(), "Stored document");
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = self.operator.delete(key).await {
                    warn!(key = %key, error = %cleanup, "Could not remove partial document");
                }
                Err(StorageError::from(e))
            }
        }
    }

    /// Reads the document under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if nothing is stored there.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        validate_key(key)?;
        match self.operator.read(key).await {
            Ok(buffer) => Ok(buffer.to_vec()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(key)),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Delete a document from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a document exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        if validate_key(key).is_err() {
            return false;
        }
        self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|part| part == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Sanitized names never contain path separators, so a key always stays
    // inside its church folder.
    proptest! {
        #[test]
        fn prop_sanitized_filename_has_no_separators(filename in ".{0,64}") {
            let sanitized = sanitize_filename(&filename);
            prop_assert!(!sanitized.contains('/'));
            prop_assert!(!sanitized.contains('\\'));
            prop_assert_eq!(sanitized.chars().count(), filename.chars().count());
        }
    }

    proptest! {
        #[test]
        fn prop_receipt_key_is_valid(filename in "[a-zA-Z0-9_ -]{1,40}\\.pdf") {
            let store = DocumentStore::from_config(StorageConfig::new(StorageProvider::local_fs("./test")))
                .expect("should create store");
            let church_id = ChurchId::new();

            let key = store.receipt_key(church_id, &filename);

            prop_assert!(validate_key(&key).is_ok());
            let expected_prefix = format!("receipts/{church_id}/");
            prop_assert!(key.starts_with(&expected_prefix));
        }
    }
}
