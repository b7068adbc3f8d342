//! Church repository for database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::churches;

/// Input for creating a church.
#[derive(Debug, Clone)]
pub struct NewChurch {
    /// Church name.
    pub name: String,
    /// Fiscal identifier of the church.
    pub nif: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country, free text.
    pub country: Option<String>,
    /// Currency symbol printed on receipts.
    pub currency_symbol: String,
}

/// Church repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ChurchRepository {
    db: DatabaseConnection,
}

impl ChurchRepository {
    /// Creates a new church repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a church by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<churches::Model>, DbErr> {
        churches::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a church.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: NewChurch) -> Result<churches::Model, DbErr> {
        churches::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            nif: Set(input.nif),
            address: Set(input.address),
            city: Set(input.city),
            country: Set(input.country),
            currency_symbol: Set(input.currency_symbol),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
    }
}
