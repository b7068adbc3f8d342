//! API route definitions.

use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
};
use ecclesia_core::documents::RenderedDocument;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod contributions;
pub mod declarations;
pub mod health;
pub mod receipts;

/// Creates the public API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes())
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(declarations::routes())
        .merge(receipts::routes())
        .merge(contributions::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    api_routes().merge(protected_routes)
}

/// Answers with `bytes` as a file download named `filename`.
pub fn attachment(filename: &str, content_type: &'static str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', ""));
    (
        [(CONTENT_TYPE, content_type.to_string()), (CONTENT_DISPOSITION, disposition)],
        bytes,
    )
        .into_response()
}

/// Answers with a freshly rendered document.
pub fn download(document: RenderedDocument) -> Response {
    attachment(&document.filename, document.content_type, document.bytes)
}
