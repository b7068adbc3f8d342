//! Contribution repository for database operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ecclesia_core::fiscal::{ContributionKind, ContributionRecord, Donor, FiscalYear};
use ecclesia_shared::types::{ChurchId, ContributionId, MemberId, from_minor_units, to_minor_units};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::RepositoryError;
use super::member::donor_from_model;
use crate::entities::{contributions, members};

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct NewContribution {
    /// Church recording the transaction.
    pub church_id: Uuid,
    /// Donor, when the money came from a known member.
    pub member_id: Option<Uuid>,
    /// Income or expense.
    pub kind: ContributionKind,
    /// Free-form category, e.g. "tithe".
    pub category: String,
    /// Amount with at most two decimal places.
    pub amount: Decimal,
    /// Optional note.
    pub description: Option<String>,
    /// When the money moved.
    pub occurred_at: DateTime<Utc>,
}

/// Contribution repository.
#[derive(Debug, Clone)]
pub struct ContributionRepository {
    db: DatabaseConnection,
}

impl ContributionRepository {
    /// Creates a new contribution repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not representable in cents, the
    /// donor is not a member of the church, or the insert fails.
    pub async fn create(
        &self,
        input: NewContribution,
    ) -> Result<contributions::Model, RepositoryError> {
        let amount_cents =
            to_minor_units(input.amount).ok_or(RepositoryError::InvalidAmount(input.amount))?;

        if let Some(member_id) = input.member_id {
            let member = members::Entity::find_by_id(member_id)
                .filter(members::Column::ChurchId.eq(input.church_id))
                .one(&self.db)
                .await?;
            if member.is_none() {
                return Err(RepositoryError::MemberNotFound(member_id));
            }
        }

        let model = contributions::ActiveModel {
            id: Set(Uuid::now_v7()),
            church_id: Set(input.church_id),
            member_id: Set(input.member_id),
            kind: Set(input.kind.as_str().to_string()),
            category: Set(input.category),
            amount_cents: Set(amount_cents),
            description: Set(input.description),
            occurred_at: Set(input.occurred_at),
            receipt_key: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(model)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<contributions::Model>, DbErr> {
        contributions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Loads the attributed incoming transactions of a church in a year,
    /// together with the members who made them.
    ///
    /// The window is `[Jan 1, Jan 1 of the next year)`. An unknown church
    /// yields empty lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row holds an unknown kind.
    pub async fn donations_for_year(
        &self,
        church_id: ChurchId,
        year: FiscalYear,
    ) -> Result<(Vec<ContributionRecord>, Vec<Donor>), RepositoryError> {
        let (start, end) = year.window();

        let rows = contributions::Entity::find()
            .filter(contributions::Column::ChurchId.eq(church_id.into_inner()))
            .filter(contributions::Column::Kind.eq(ContributionKind::Income.as_str()))
            .filter(contributions::Column::MemberId.is_not_null())
            .filter(contributions::Column::OccurredAt.gte(start))
            .filter(contributions::Column::OccurredAt.lt(end))
            .order_by_asc(contributions::Column::OccurredAt)
            .find_also_related(members::Entity)
            .all(&self.db)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        let mut donors: BTreeMap<Uuid, Donor> = BTreeMap::new();

        for (contribution, member) in rows {
            records.push(record_from_model(&contribution)?);
            if let Some(member) = member {
                donors
                    .entry(member.id)
                    .or_insert_with(|| donor_from_model(&member));
            }
        }

        debug!(
            church_id = %church_id,
            year = %year,
            records = records.len(),
            donors = donors.len(),
            "Loaded donations"
        );

        Ok((records, donors.into_values().collect()))
    }

    /// Points a transaction at its generated receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_receipt_key(
        &self,
        id: Uuid,
        receipt_key: &str,
    ) -> Result<contributions::Model, DbErr> {
        contributions::ActiveModel {
            id: Set(id),
            receipt_key: Set(Some(receipt_key.to_string())),
            ..Default::default()
        }
        .update(&self.db)
        .await
    }
}

/// Converts a stored row into the domain record.
///
/// # Errors
///
/// Returns `RepositoryError::Corrupt` if the row holds an unknown kind.
pub fn record_from_model(model: &contributions::Model) -> Result<ContributionRecord, RepositoryError> {
    let kind = model
        .kind
        .parse::<ContributionKind>()
        .map_err(|e| RepositoryError::Corrupt(e.to_string()))?;

    Ok(ContributionRecord {
        id: ContributionId::from_uuid(model.id),
        church_id: ChurchId::from_uuid(model.church_id),
        donor_id: model.member_id.map(MemberId::from_uuid),
        kind,
        amount: from_minor_units(model.amount_cents),
        occurred_at: model.occurred_at,
        receipt_key: model.receipt_key.clone(),
    })
}
