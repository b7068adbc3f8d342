//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Generated document configuration.
    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Bearer token verification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret shared with the identity provider that mints the tokens.
    pub secret: String,
}

/// Where generated fiscal documents live and which form template they fill.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsConfig {
    /// Root directory for generated receipts and declarations.
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
    /// Path to the blank official donations form (Modelo 25).
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    /// Operation code printed on every declaration row.
    #[serde(default = "default_operation_code")]
    pub operation_code: String,
    /// Backend for generated documents; `storage_root` on local disk when absent.
    #[serde(default)]
    pub storage: Option<StorageProvider>,
}

impl DocumentsConfig {
    /// Backend the document store is built on.
    #[must_use]
    pub fn storage_provider(&self) -> StorageProvider {
        self.storage
            .clone()
            .unwrap_or_else(|| StorageProvider::local_fs(self.storage_root.clone()))
    }
}

/// Backend holding generated documents.
///
/// Selected with `documents.storage.type`: `s3`, `azure_blob` or `local_fs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible bucket (AWS S3, Cloudflare R2, MinIO).
    S3 {
        /// Endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage container.
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage access key.
        access_key: String,
        /// Container name.
        container: String,
    },
    /// Directory on the local filesystem.
    LocalFs {
        /// Root directory.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Local directory provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            template_path: default_template_path(),
            operation_code: default_operation_code(),
            storage: None,
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_template_path() -> PathBuf {
    PathBuf::from("./static/templates_fiscais/MOD_25.pdf")
}

fn default_operation_code() -> String {
    // Cash or in-kind donations.
    "01".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ECCLESIA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("ECCLESIA__DATABASE__URL", Some("sqlite::memory:")),
                ("ECCLESIA__JWT__SECRET", Some("shh")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "shh");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.documents.operation_code, "01");
                assert!(config.documents.template_path.ends_with("MOD_25.pdf"));
            },
        );
    }

    #[test]
    fn test_documents_defaults() {
        let docs = DocumentsConfig::default();
        assert_eq!(docs.storage_root, PathBuf::from("./storage"));
        assert_eq!(docs.operation_code, "01");
        assert_eq!(docs.storage_provider(), StorageProvider::local_fs("./storage"));
        assert_eq!(docs.storage_provider().name(), "local");
    }

    #[test]
    fn test_load_s3_storage_section() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("ECCLESIA__DATABASE__URL", Some("sqlite::memory:")),
                ("ECCLESIA__JWT__SECRET", Some("shh")),
                ("ECCLESIA__DOCUMENTS__STORAGE__TYPE", Some("s3")),
                ("ECCLESIA__DOCUMENTS__STORAGE__ENDPOINT", Some("http://127.0.0.1:9000")),
                ("ECCLESIA__DOCUMENTS__STORAGE__BUCKET", Some("documents")),
                ("ECCLESIA__DOCUMENTS__STORAGE__ACCESS_KEY_ID", Some("access")),
                ("ECCLESIA__DOCUMENTS__STORAGE__SECRET_ACCESS_KEY", Some("secret")),
                ("ECCLESIA__DOCUMENTS__STORAGE__REGION", Some("us-east-1")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                let provider = config.documents.storage_provider();

                assert_eq!(provider.name(), "s3");
                assert_eq!(
                    provider,
                    StorageProvider::S3 {
                        endpoint: "http://127.0.0.1:9000".to_string(),
                        bucket: "documents".to_string(),
                        access_key_id: "access".to_string(),
                        secret_access_key: "secret".to_string(),
                        region: "us-east-1".to_string(),
                    }
                );
            },
        );
    }

    #[test]
    fn test_azure_storage_section_from_toml() {
        let docs: DocumentsConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [storage]
                type = "azure_blob"
                account = "ecclesiadev"
                access_key = "key"
                container = "documents"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(config::Config::try_deserialize)
            .expect("documents section should parse");

        assert_eq!(docs.storage_provider().name(), "azure_blob");
        assert_eq!(docs.operation_code, "01");
    }
}
