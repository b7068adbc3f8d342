//! Donor annual receipt routes.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use ecclesia_core::fiscal::FiscalYear;
use ecclesia_shared::types::{ChurchId, MemberId};
use uuid::Uuid;

use super::download;
use crate::{ApiError, AppState, middleware::AuthUser, services::FiscalReportService};

/// Creates the receipt routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/churches/{church_id}/members/{member_id}/receipts/{year}",
        get(donor_receipt),
    )
}

/// GET `/churches/{church_id}/members/{member_id}/receipts/{year}` - What a member gave in a year.
///
/// Finance roles may fetch any member's receipt; a member only their own.
async fn donor_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((church_id, member_id, year)): Path<(Uuid, Uuid, i32)>,
) -> Result<Response, ApiError> {
    let church_id = ChurchId::from_uuid(church_id);
    let member_id = MemberId::from_uuid(member_id);
    auth.requester()
        .ensure_receipt_access(church_id, Some(member_id))?;
    let year = FiscalYear::new(year)?;

    let document = FiscalReportService::new((*state.db).clone(), state.documents_config.clone())
        .donor_receipt(church_id, member_id, year)
        .await?;

    state.documents.store(church_id, &document).await?;
    Ok(download(document))
}
