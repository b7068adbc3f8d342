//! Contribution recording and receipt routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use ecclesia_core::documents::PDF_CONTENT_TYPE;
use ecclesia_core::fiscal::ContributionKind;
use ecclesia_core::storage::StorageError;
use ecclesia_db::{ContributionRepository, NewContribution, entities::contributions};
use ecclesia_shared::types::{ChurchId, MemberId, from_minor_units};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::{attachment, download};
use crate::{
    ApiError, AppState,
    middleware::AuthUser,
    services::{issue_contribution_receipt, receipts::filename_from_key},
};

/// Creates the contribution routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/churches/{church_id}/contributions",
            post(create_contribution),
        )
        .route(
            "/churches/{church_id}/contributions/{contribution_id}/receipt",
            get(contribution_receipt),
        )
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContributionRequest {
    /// Donor, for attributed income.
    pub member_id: Option<Uuid>,
    /// `income` or `expense`.
    pub kind: ContributionKind,
    /// Category, e.g. "dizimo" or "oferta".
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    /// Positive amount with at most two decimals.
    pub amount: Decimal,
    /// Free-form note.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// When the money moved; defaults to now.
    pub occurred_at: Option<DateTime<Utc>>,
}

/// A recorded transaction.
#[derive(Debug, Serialize)]
pub struct ContributionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Owning church.
    pub church_id: Uuid,
    /// Donor, if attributed.
    pub member_id: Option<Uuid>,
    /// Income or expense.
    pub kind: String,
    /// Category.
    pub category: String,
    /// Amount.
    pub amount: Decimal,
    /// Note.
    pub description: Option<String>,
    /// When the money moved.
    pub occurred_at: DateTime<Utc>,
    /// Storage key of the receipt, once issued.
    pub receipt_key: Option<String>,
}

impl From<contributions::Model> for ContributionResponse {
    fn from(model: contributions::Model) -> Self {
        Self {
            id: model.id,
            church_id: model.church_id,
            member_id: model.member_id,
            kind: model.kind,
            category: model.category,
            amount: from_minor_units(model.amount_cents),
            description: model.description,
            occurred_at: model.occurred_at,
            receipt_key: model.receipt_key,
        }
    }
}

/// POST `/churches/{church_id}/contributions` - Record a transaction.
///
/// A receipt is issued right away when a donor is attached. If that fails the
/// transaction stays recorded and the receipt is produced on first download.
async fn create_contribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(church_id): Path<Uuid>,
    Json(payload): Json<CreateContributionRequest>,
) -> Result<Response, ApiError> {
    auth.requester()
        .ensure_finance(ChurchId::from_uuid(church_id))?;

    payload
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    if payload.amount <= Decimal::ZERO {
        return Err(ApiError::validation("Amount must be positive"));
    }

    let repo = ContributionRepository::new((*state.db).clone());
    let mut created = repo
        .create(NewContribution {
            church_id,
            member_id: payload.member_id,
            kind: payload.kind,
            category: payload.category,
            amount: payload.amount,
            description: payload.description,
            occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
        })
        .await?;

    info!(
        church_id = %church_id,
        contribution_id = %created.id,
        kind = %created.kind,
        "Contribution recorded"
    );

    if created.member_id.is_some() {
        match issue_contribution_receipt(&state.db, &state.documents, &created).await {
            Ok((key, _)) => created.receipt_key = Some(key),
            Err(e) => {
                warn!(contribution_id = %created.id, error = ?e, "Receipt not issued");
            }
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(ContributionResponse::from(created)),
    )
        .into_response())
}

/// GET `/churches/{church_id}/contributions/{contribution_id}/receipt` - Transaction receipt.
///
/// Served from storage when already issued, generated otherwise.
async fn contribution_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((church_id, contribution_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    let requester = auth.requester();
    requester.ensure_church(ChurchId::from_uuid(church_id))?;

    let contribution = ContributionRepository::new((*state.db).clone())
        .find_by_id(contribution_id)
        .await?
        .filter(|c| c.church_id == church_id)
        .ok_or_else(|| ApiError::not_found("Contribution not found"))?;

    requester.ensure_receipt_access(
        ChurchId::from_uuid(church_id),
        contribution.member_id.map(MemberId::from_uuid),
    )?;

    if let Some(key) = contribution.receipt_key.as_deref() {
        match state.documents.read(key).await {
            Ok(bytes) => {
                return Ok(attachment(filename_from_key(key), PDF_CONTENT_TYPE, bytes));
            }
            Err(StorageError::NotFound { .. }) => {
                warn!(key = %key, "Stored receipt is gone, issuing again");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let (_, document) = issue_contribution_receipt(&state.db, &state.documents, &contribution).await?;
    Ok(download(document))
}
