//! Conversion of domain failures into JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ecclesia_core::{
    access::AccessError, documents::DocumentError, fiscal::FiscalError, storage::StorageError,
};
use ecclesia_db::RepositoryError;
use ecclesia_shared::AppError;
use sea_orm::DbErr;
use serde_json::json;
use tracing::{error, warn};

/// Message shown when the blank official form is not installed.
pub const TEMPLATE_MISSING_MESSAGE: &str =
    "The official form template is not installed on this server. Download the spreadsheet version instead.";

/// Handler error: an [`AppError`] that renders as `{"error", "message"}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 404 with `message`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 400 with `message`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self(AppError::Forbidden(err.to_string()))
    }
}

impl From<FiscalError> for ApiError {
    fn from(err: FiscalError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MemberNotFound(_) => Self(AppError::NotFound(err.to_string())),
            RepositoryError::InvalidAmount(_) => Self(AppError::Validation(err.to_string())),
            RepositoryError::Corrupt(_) | RepositoryError::Database(_) => {
                Self(AppError::Database(err.to_string()))
            }
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::TemplateMissing { ref path } => {
                warn!(path = %path.display(), "Form template missing");
                Self(AppError::BusinessRule(TEMPLATE_MISSING_MESSAGE.to_string()))
            }
            ref e if e.is_user_facing() => Self(AppError::BusinessRule(e.to_string())),
            e => Self(AppError::Internal(e.to_string())),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => Self(AppError::NotFound(err.to_string())),
            e => Self(AppError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_template_is_business_rule() {
        let err = ApiError::from(DocumentError::TemplateMissing {
            path: PathBuf::from("/nope/MOD_25.pdf"),
        });

        assert_eq!(err.0.status_code(), 422);
        assert!(err.0.public_message().contains("spreadsheet"));
    }

    #[test]
    fn test_overflow_is_business_rule() {
        let err = ApiError::from(DocumentError::TemplateOverflow {
            rows: 40,
            capacity: 29,
        });
        assert_eq!(err.0.status_code(), 422);
    }

    #[test]
    fn test_access_errors_are_forbidden() {
        assert_eq!(ApiError::from(AccessError::WrongChurch).0.status_code(), 403);
        assert_eq!(ApiError::from(AccessError::NotOwner).0.status_code(), 403);
    }

    #[test]
    fn test_storage_write_failure_hides_detail() {
        let err = ApiError::from(StorageError::Operation("disk full at /var/x".into()));
        assert_eq!(err.0.status_code(), 500);
        assert_eq!(err.0.public_message(), "An error occurred");
    }

    #[test]
    fn test_repository_errors_map_to_status() {
        let missing = ApiError::from(RepositoryError::MemberNotFound(uuid::Uuid::nil()));
        assert_eq!(missing.0.status_code(), 404);

        let cents = ApiError::from(RepositoryError::InvalidAmount(rust_decimal_macros::dec!(0.001)));
        assert_eq!(cents.0.status_code(), 400);

        let corrupt = ApiError::from(RepositoryError::Corrupt("kind=refund".into()));
        assert_eq!(corrupt.0.status_code(), 500);
    }

    #[test]
    fn test_invalid_year_is_validation() {
        let err = ApiError::from(FiscalError::InvalidYear {
            year: 10,
            min: 1900,
            max: 9998,
        });
        assert_eq!(err.0.status_code(), 400);
    }
}
