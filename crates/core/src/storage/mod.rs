//! Storage of generated documents using Apache OpenDAL.
//!
//! Backends:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO
//! - Azure Blob Storage
//! - Local filesystem (development and single-node installs)
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     DocumentStore                        │
//! │     receipts/{church_id}/{filename}  ->  bytes           │
//! ├──────────────────────────────────────────────────────────┤
//! │ op.write(key, bytes)  │ op.read(key)  │ op.delete(key)   │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::DocumentStore;
