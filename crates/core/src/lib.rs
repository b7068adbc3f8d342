//! Core business logic for Ecclesia.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and document rendering live here.
//!
//! # Modules
//!
//! - `fiscal` - Donor aggregation, tax identifier validation, declarations
//! - `documents` - Spreadsheet and PDF fillers for declarations and receipts
//! - `storage` - Where generated documents are kept
//! - `access` - Finance roles and tenant checks

pub mod access;
pub mod documents;
pub mod fiscal;
pub mod storage;
