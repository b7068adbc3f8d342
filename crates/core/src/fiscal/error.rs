//! Fiscal reporting error types.

use thiserror::Error;

/// Errors raised while preparing a fiscal declaration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FiscalError {
    /// Year outside the range a declaration can be filed for.
    #[error("invalid fiscal year {year}: must be between {min} and {max}")]
    InvalidYear {
        /// Requested year.
        year: i32,
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year.
        max: i32,
    },

    /// Transaction kind not recognised.
    #[error("unknown transaction kind: {0}")]
    UnknownKind(String),
}
