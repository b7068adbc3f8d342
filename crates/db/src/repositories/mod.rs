//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod church;
pub mod contribution;
pub mod member;

pub use church::{ChurchRepository, NewChurch};
pub use contribution::{ContributionRepository, NewContribution};
pub use member::{MemberRepository, NewMember};

use rust_decimal::Decimal;
use sea_orm::DbErr;
use uuid::Uuid;

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Member not found in the church.
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    /// Amount has more than two decimal places or does not fit.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Stored row holds a value the domain does not know.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}
