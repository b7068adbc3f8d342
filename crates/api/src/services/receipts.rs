//! Receipts for single contributions.

use ecclesia_core::documents::{ContributionDetails, ContributionReceipt, RenderedDocument};
use ecclesia_core::storage::DocumentStore;
use ecclesia_db::{ChurchRepository, ContributionRepository, MemberRepository, entities::contributions};
use ecclesia_shared::types::{ChurchId, ContributionId, Currency, Money, from_minor_units};
use sea_orm::DatabaseConnection;
use tracing::info;

use super::fiscal::issuer;
use crate::ApiError;

/// Renders, stores and links the receipt of `contribution`.
///
/// Returns the storage key alongside the rendered file.
pub async fn issue_contribution_receipt(
    db: &DatabaseConnection,
    store: &DocumentStore,
    contribution: &contributions::Model,
) -> Result<(String, RenderedDocument), ApiError> {
    let church = ChurchRepository::new(db.clone())
        .find_by_id(contribution.church_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Church not found"))?;

    let donor_name = match contribution.member_id {
        Some(member_id) => MemberRepository::new(db.clone())
            .find_by_id(member_id)
            .await?
            .map(|member| member.name),
        None => None,
    };

    let details = ContributionDetails {
        id: ContributionId::from_uuid(contribution.id),
        donor_name,
        amount: Money::new(
            from_minor_units(contribution.amount_cents),
            Currency::from_symbol(&church.currency_symbol),
        ),
        category: contribution.category.clone(),
        occurred_at: contribution.occurred_at,
    };

    let document = ContributionReceipt::render(&issuer(&church), &details)?;
    let church_id = ChurchId::from_uuid(church.id);
    let key = store.store(church_id, &document).await?;

    ContributionRepository::new(db.clone())
        .set_receipt_key(contribution.id, &key)
        .await?;

    info!(
        church_id = %church_id,
        contribution_id = %contribution.id,
        key = %key,
        "Issued contribution receipt"
    );

    Ok((key, document))
}

/// Download name of a stored receipt: the last segment of its key.
#[must_use]
pub fn filename_from_key(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
