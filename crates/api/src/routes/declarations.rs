//! Annual donations declaration routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use chrono::{Datelike, Utc};
use ecclesia_core::documents::RenderedDocument;
use ecclesia_core::fiscal::{DeclarationStats, DonorTotal, FiscalYear};
use ecclesia_shared::types::ChurchId;
use serde::Serialize;
use uuid::Uuid;

use super::download;
use crate::{ApiError, AppState, middleware::AuthUser, services::FiscalReportService};

/// How many past years are offered besides the current one.
const YEARS_BACK: i32 = 5;

/// Creates the declaration routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/churches/{church_id}/declarations", get(list_years))
        .route(
            "/churches/{church_id}/declarations/{year}/preview",
            get(preview),
        )
        .route(
            "/churches/{church_id}/declarations/{year}/spreadsheet",
            get(spreadsheet),
        )
        .route(
            "/churches/{church_id}/declarations/{year}/form-pdf",
            get(form_pdf),
        )
        .route(
            "/churches/{church_id}/declarations/{year}/report-pdf",
            get(report_pdf),
        )
}

/// Years a declaration can be requested for.
#[derive(Debug, Serialize)]
pub struct AvailableYearsResponse {
    /// Current year back to five years ago, newest first.
    pub years: Vec<i32>,
    /// The year normally filed: last year.
    pub default_year: i32,
}

/// JSON preview of a declaration.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Declaring church.
    pub church_id: Uuid,
    /// Year declared.
    pub year: FiscalYear,
    /// Fiscal identifier of the church, digits only.
    pub declarant_nif: Option<String>,
    /// Donors that go on the form.
    pub valid: Vec<DonorTotal>,
    /// Donors left out for a missing or invalid identifier.
    pub excluded: Vec<DonorTotal>,
    /// Summary figures.
    pub stats: DeclarationStats,
}

/// Years offered relative to `current`.
fn available_years(current: i32) -> AvailableYearsResponse {
    AvailableYearsResponse {
        years: (current - YEARS_BACK..=current).rev().collect(),
        default_year: current - 1,
    }
}

/// GET `/churches/{church_id}/declarations` - Years available for declaration.
async fn list_years(
    auth: AuthUser,
    Path(church_id): Path<Uuid>,
) -> Result<Json<AvailableYearsResponse>, ApiError> {
    auth.requester().ensure_finance(ChurchId::from_uuid(church_id))?;
    Ok(Json(available_years(Utc::now().year())))
}

/// GET `/churches/{church_id}/declarations/{year}/preview` - Declaration as JSON.
async fn preview(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((church_id, year)): Path<(Uuid, i32)>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let (church_id, year) = authorize(&auth, church_id, year)?;

    let result = service(&state).declaration(church_id, year).await?;
    let declarant_nif = result.form(&state.documents_config.operation_code).declarant_nif;

    Ok(Json(PreviewResponse {
        church_id: church_id.into_inner(),
        year,
        declarant_nif,
        valid: result.declaration.valid,
        excluded: result.declaration.excluded,
        stats: result.declaration.stats,
    }))
}

/// GET `/churches/{church_id}/declarations/{year}/spreadsheet` - xlsx download.
async fn spreadsheet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((church_id, year)): Path<(Uuid, i32)>,
) -> Result<Response, ApiError> {
    let (church_id, year) = authorize(&auth, church_id, year)?;
    let document = service(&state).spreadsheet(church_id, year).await?;
    persist_and_download(&state, church_id, document).await
}

/// GET `/churches/{church_id}/declarations/{year}/form-pdf` - Filled official form.
async fn form_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((church_id, year)): Path<(Uuid, i32)>,
) -> Result<Response, ApiError> {
    let (church_id, year) = authorize(&auth, church_id, year)?;
    let document = service(&state).form_pdf(church_id, year).await?;
    persist_and_download(&state, church_id, document).await
}

/// GET `/churches/{church_id}/declarations/{year}/report-pdf` - Self-drawn official layout.
async fn report_pdf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((church_id, year)): Path<(Uuid, i32)>,
) -> Result<Response, ApiError> {
    let (church_id, year) = authorize(&auth, church_id, year)?;
    let document = service(&state).report_pdf(church_id, year).await?;
    persist_and_download(&state, church_id, document).await
}

fn authorize(auth: &AuthUser, church_id: Uuid, year: i32) -> Result<(ChurchId, FiscalYear), ApiError> {
    let church_id = ChurchId::from_uuid(church_id);
    auth.requester().ensure_finance(church_id)?;
    Ok((church_id, FiscalYear::new(year)?))
}

fn service(state: &AppState) -> FiscalReportService {
    FiscalReportService::new((*state.db).clone(), state.documents_config.clone())
}

async fn persist_and_download(
    state: &AppState,
    church_id: ChurchId,
    document: RenderedDocument,
) -> Result<Response, ApiError> {
    state.documents.store(church_id, &document).await?;
    Ok(download(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_years() {
        let years = available_years(2026);
        assert_eq!(years.years, vec![2026, 2025, 2024, 2023, 2022, 2021]);
        assert_eq!(years.default_year, 2025);
    }
}
