//! Shared types, errors, and configuration for Ecclesia.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - Bearer token claims and verification

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, DocumentsConfig, StorageProvider};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
