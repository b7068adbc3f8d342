//! Router-level tests: authentication, tenancy and response shapes.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use ecclesia_api::{AppState, create_router};
use ecclesia_core::fiscal::ContributionKind;
use ecclesia_core::storage::{DocumentStore, StorageConfig, StorageProvider};
use ecclesia_db::{
    ChurchRepository, ContributionRepository, MemberRepository, NewChurch, NewContribution,
    NewMember,
    migration::{Migrator, MigratorTrait},
};
use ecclesia_shared::{DocumentsConfig, JwtConfig, JwtService};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
    church_id: Uuid,
    ana_id: Uuid,
    bruno_id: Uuid,
    _dir: TempDir,
}

impl TestApp {
    fn token(&self, member_id: Uuid, church_id: Uuid, role: &str) -> String {
        self.jwt
            .issue_token(member_id, church_id, role)
            .expect("Failed to issue token")
    }

    fn treasurer_token(&self) -> String {
        self.token(Uuid::now_v7(), self.church_id, "treasurer")
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(&self, uri: &str, token: &str, body: &Value) -> axum::response::Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open sqlite");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

async fn donate(db: &DatabaseConnection, church_id: Uuid, member_id: Uuid, amount: Decimal, month: u32) {
    ContributionRepository::new(db.clone())
        .create(NewContribution {
            church_id,
            member_id: Some(member_id),
            kind: ContributionKind::Income,
            category: "dizimo".to_string(),
            amount,
            description: None,
            occurred_at: Utc.with_ymd_and_hms(2025, month, 10, 10, 0, 0).unwrap(),
        })
        .await
        .expect("Failed to record contribution");
}

/// Church with Ana (valid NIF, 50.00 + 75.25 in 2025) and Bruno (placeholder NIF, 10.00).
async fn setup() -> TestApp {
    let db = connect().await;
    let dir = tempfile::tempdir().unwrap();

    let church = ChurchRepository::new(db.clone())
        .create(NewChurch {
            name: "Igreja Central".to_string(),
            nif: Some("501964843".to_string()),
            address: Some("Rua das Flores 10".to_string()),
            city: Some("Lisboa".to_string()),
            country: Some("Portugal".to_string()),
            currency_symbol: "€".to_string(),
        })
        .await
        .expect("Failed to create church");

    let members = MemberRepository::new(db.clone());
    let new_member = |name: &str, tax_id: &str| NewMember {
        church_id: church.id,
        name: name.to_string(),
        email: None,
        tax_id: Some(tax_id.to_string()),
        address: None,
        role: "member".to_string(),
        status: "active".to_string(),
    };
    let ana = members.create(new_member("Ana", "123456789")).await.unwrap();
    let bruno = members.create(new_member("Bruno", "000000000")).await.unwrap();

    donate(&db, church.id, ana.id, dec!(50.00), 2).await;
    donate(&db, church.id, ana.id, dec!(75.25), 8).await;
    donate(&db, church.id, bruno.id, dec!(10.00), 5).await;

    let jwt = Arc::new(JwtService::new(JwtConfig {
        secret: "router-test-secret".to_string(),
        token_expires_minutes: 15,
    }));
    let documents = DocumentStore::from_config(StorageConfig::new(StorageProvider::local_fs(
        dir.path().join("storage"),
    )))
    .expect("Failed to create store");

    let state = AppState {
        db: Arc::new(db),
        jwt_service: jwt.clone(),
        documents: Arc::new(documents),
        documents_config: Arc::new(DocumentsConfig {
            storage_root: dir.path().join("storage"),
            template_path: dir.path().join("MOD_25.pdf"),
            operation_code: "01".to_string(),
            storage: None,
        }),
    };

    TestApp {
        router: create_router(state),
        jwt,
        church_id: church.id,
        ana_id: ana.id,
        bruno_id: bruno.id,
        _dir: dir,
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn raw_body(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup().await;
    let response = app.get("/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations/2025/preview", app.church_id);

    let response = app.get(&uri, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "missing_token");
}

#[tokio::test]
async fn test_forged_token_is_unauthorized() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations", app.church_id);

    let response = app.get(&uri, Some("not.a.token")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_another_church_is_forbidden() {
    let app = setup().await;
    let token = app.token(Uuid::now_v7(), Uuid::now_v7(), "treasurer");
    let uri = format!("/api/v1/churches/{}/declarations/2025/preview", app.church_id);

    let response = app.get(&uri, Some(&token)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_plain_member_cannot_preview() {
    let app = setup().await;
    let token = app.token(app.ana_id, app.church_id, "member");
    let uri = format!("/api/v1/churches/{}/declarations/2025/preview", app.church_id);

    let response = app.get(&uri, Some(&token)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_years() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations", app.church_id);

    let response = app.get(&uri, Some(&app.treasurer_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let years = body["years"].as_array().unwrap();
    assert_eq!(years.len(), 6);
    assert_eq!(body["default_year"], years[1]);
}

#[tokio::test]
async fn test_preview_shape() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations/2025/preview", app.church_id);

    let response = app.get(&uri, Some(&app.treasurer_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["year"], 2025);
    assert_eq!(body["declarant_nif"], "501964843");
    assert_eq!(body["valid"].as_array().unwrap().len(), 1);
    assert_eq!(body["valid"][0]["donor"]["display_name"], "Ana");
    assert_eq!(body["valid"][0]["record_count"], 2);
    assert_eq!(body["excluded"][0]["donor"]["display_name"], "Bruno");
    assert_eq!(body["stats"]["total_donors"], 1);
    assert_eq!(body["stats"]["excluded_donors"], 1);
    assert_eq!(body["stats"]["total_amount"], json!("125.25"));
}

#[tokio::test]
async fn test_preview_rejects_out_of_range_year() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations/1800/preview", app.church_id);

    let response = app.get(&uri, Some(&app.treasurer_token())).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_spreadsheet_download() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations/2025/spreadsheet", app.church_id);

    let response = app.get(&uri, Some(&app.treasurer_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Modelo25_501964843_2025.xlsx\""
    );
    assert!(raw_body(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn test_report_pdf_download() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations/2025/report-pdf", app.church_id);

    let response = app.get(&uri, Some(&app.treasurer_token())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert!(raw_body(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_form_pdf_without_template_suggests_spreadsheet() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/declarations/2025/form-pdf", app.church_id);

    let response = app.get(&uri, Some(&app.treasurer_token())).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
    assert!(body["message"].as_str().unwrap().contains("spreadsheet"));
}

#[tokio::test]
async fn test_member_downloads_own_annual_receipt_only() {
    let app = setup().await;
    let token = app.token(app.ana_id, app.church_id, "member");

    let own = format!("/api/v1/churches/{}/members/{}/receipts/2025", app.church_id, app.ana_id);
    let response = app.get(&own, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(raw_body(response).await.starts_with(b"%PDF"));

    let other = format!("/api/v1/churches/{}/members/{}/receipts/2025", app.church_id, app.bruno_id);
    let response = app.get(&other, Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_annual_receipt_for_year_without_gifts_is_not_found() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/members/{}/receipts/2024", app.church_id, app.ana_id);

    let response = app.get(&uri, Some(&app.treasurer_token())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_contribution_issues_receipt() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/contributions", app.church_id);
    let body = json!({
        "member_id": app.ana_id,
        "kind": "income",
        "category": "oferta",
        "amount": "20.50",
        "occurred_at": "2025-03-02T11:00:00Z"
    });

    let response = app.post_json(&uri, &app.treasurer_token(), &body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert!(created["receipt_key"].as_str().unwrap().ends_with("_20250302.pdf"));

    let receipt_uri = format!(
        "/api/v1/churches/{}/contributions/{}/receipt",
        app.church_id,
        created["id"].as_str().unwrap()
    );
    let ana = app.token(app.ana_id, app.church_id, "member");
    let response = app.get(&receipt_uri, Some(&ana)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(raw_body(response).await.starts_with(b"%PDF"));

    let bruno = app.token(app.bruno_id, app.church_id, "member");
    let response = app.get(&receipt_uri, Some(&bruno)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_anonymous_contribution_receipt_is_generated_lazily() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/contributions", app.church_id);
    let body = json!({ "kind": "income", "category": "oferta", "amount": "5.00" });

    let response = app.post_json(&uri, &app.treasurer_token(), &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert!(created["receipt_key"].is_null());

    let receipt_uri = format!(
        "/api/v1/churches/{}/contributions/{}/receipt",
        app.church_id,
        created["id"].as_str().unwrap()
    );
    let response = app.get(&receipt_uri, Some(&app.treasurer_token())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(raw_body(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_record_contribution_rejects_bad_amounts() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/contributions", app.church_id);

    for amount in ["0", "-3.00", "1.005"] {
        let body = json!({ "kind": "income", "category": "oferta", "amount": amount });
        let response = app.post_json(&uri, &app.treasurer_token(), &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "amount {amount}");
    }
}

#[tokio::test]
async fn test_member_cannot_record_contributions() {
    let app = setup().await;
    let uri = format!("/api/v1/churches/{}/contributions", app.church_id);
    let token = app.token(app.ana_id, app.church_id, "member");
    let body = json!({ "kind": "income", "category": "oferta", "amount": "5.00" });

    let response = app.post_json(&uri, &token, &body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
