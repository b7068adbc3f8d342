//! Member repository for database operations.

use chrono::Utc;
use ecclesia_core::fiscal::Donor;
use ecclesia_shared::types::MemberId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::members;

/// Input for registering a member.
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Church the member belongs to.
    pub church_id: Uuid,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Taxpayer identifier, as typed.
    pub tax_id: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Role in the church (`admin`, `lead_pastor`, `treasurer`, `member`).
    pub role: String,
    /// Registration status (`pending`, `active`, `rejected`).
    pub status: String,
}

/// Member repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a member of a given church.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_in_church(
        &self,
        church_id: Uuid,
        id: Uuid,
    ) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find_by_id(id)
            .filter(members::Column::ChurchId.eq(church_id))
            .one(&self.db)
            .await
    }

    /// Registers a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: NewMember) -> Result<members::Model, DbErr> {
        members::ActiveModel {
            id: Set(Uuid::now_v7()),
            church_id: Set(input.church_id),
            name: Set(input.name),
            email: Set(input.email),
            tax_id: Set(input.tax_id),
            address: Set(input.address),
            role: Set(input.role),
            status: Set(input.status),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
    }
}

/// Identity fields of a member as a donor.
#[must_use]
pub fn donor_from_model(model: &members::Model) -> Donor {
    Donor {
        id: MemberId::from_uuid(model.id),
        display_name: model.name.clone(),
        tax_identifier: model.tax_id.clone(),
        postal_address: model.address.clone(),
    }
}
