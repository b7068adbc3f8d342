//! Integration tests for the contribution repository.
//!
//! Runs against an in-memory SQLite database migrated from scratch.

use chrono::{DateTime, TimeZone, Utc};
use ecclesia_core::fiscal::{
    ContributionKind, Declaration, DonorAggregator, FiscalYear, TaxCountry,
};
use ecclesia_db::{
    ChurchRepository, ContributionRepository, MemberRepository, NewChurch, NewContribution,
    NewMember, RepositoryError,
    entities::{churches, members},
    migration::{Migrator, MigratorTrait},
};
use ecclesia_shared::types::ChurchId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open sqlite");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

async fn create_church(db: &DatabaseConnection, name: &str) -> churches::Model {
    ChurchRepository::new(db.clone())
        .create(NewChurch {
            name: name.to_string(),
            nif: Some("501964843".to_string()),
            address: Some("Rua das Flores 10".to_string()),
            city: Some("Lisboa".to_string()),
            country: Some("Portugal".to_string()),
            currency_symbol: "€".to_string(),
        })
        .await
        .expect("Failed to create church")
}

async fn create_member(
    db: &DatabaseConnection,
    church_id: Uuid,
    name: &str,
    tax_id: Option<&str>,
) -> members::Model {
    MemberRepository::new(db.clone())
        .create(NewMember {
            church_id,
            name: name.to_string(),
            email: None,
            tax_id: tax_id.map(str::to_string),
            address: None,
            role: "member".to_string(),
            status: "active".to_string(),
        })
        .await
        .expect("Failed to create member")
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

async fn record(
    repo: &ContributionRepository,
    church_id: Uuid,
    member_id: Option<Uuid>,
    kind: ContributionKind,
    amount: Decimal,
    occurred_at: DateTime<Utc>,
) {
    repo.create(NewContribution {
        church_id,
        member_id,
        kind,
        category: "dizimo".to_string(),
        amount,
        description: None,
        occurred_at,
    })
    .await
    .expect("Failed to record contribution");
}

#[tokio::test]
async fn test_donations_for_year_filters_window_kind_and_church() {
    let db = setup().await;
    let church = create_church(&db, "Igreja Central").await;
    let other = create_church(&db, "Igreja Norte").await;
    let ana = create_member(&db, church.id, "Ana Costa", Some("123456789")).await;
    let repo = ContributionRepository::new(db.clone());

    record(&repo, church.id, Some(ana.id), ContributionKind::Income, dec!(50.00), at(2025, 1, 1, 0, 0, 0)).await;
    record(&repo, church.id, Some(ana.id), ContributionKind::Income, dec!(75.25), at(2025, 12, 31, 23, 59, 59)).await;
    record(&repo, church.id, Some(ana.id), ContributionKind::Income, dec!(1.00), at(2024, 12, 31, 23, 59, 59)).await;
    record(&repo, church.id, Some(ana.id), ContributionKind::Income, dec!(2.00), at(2026, 1, 1, 0, 0, 0)).await;
    record(&repo, church.id, Some(ana.id), ContributionKind::Expense, dec!(4.00), at(2025, 6, 1, 12, 0, 0)).await;
    record(&repo, church.id, None, ContributionKind::Income, dec!(8.00), at(2025, 6, 1, 12, 0, 0)).await;

    let other_member = create_member(&db, other.id, "Rui", Some("123456789")).await;
    record(&repo, other.id, Some(other_member.id), ContributionKind::Income, dec!(16.00), at(2025, 6, 1, 12, 0, 0)).await;

    let year = FiscalYear::new(2025).unwrap();
    let church_id = ChurchId::from_uuid(church.id);
    let (records, donors) = repo.donations_for_year(church_id, year).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0].display_name, "Ana Costa");

    let totals = DonorAggregator::aggregate(church_id, year, &records, &donors);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total_amount, dec!(125.25));
    assert_eq!(totals[0].record_count, 2);
}

#[tokio::test]
async fn test_two_donor_declaration_from_database() {
    let db = setup().await;
    let church = create_church(&db, "Igreja Central").await;
    let ana = create_member(&db, church.id, "Ana", Some("123456789")).await;
    let bruno = create_member(&db, church.id, "Bruno", Some("000000000")).await;
    let repo = ContributionRepository::new(db.clone());

    record(&repo, church.id, Some(ana.id), ContributionKind::Income, dec!(50.00), at(2025, 2, 1, 10, 0, 0)).await;
    record(&repo, church.id, Some(ana.id), ContributionKind::Income, dec!(75.25), at(2025, 8, 1, 10, 0, 0)).await;
    record(&repo, church.id, Some(bruno.id), ContributionKind::Income, dec!(10.00), at(2025, 5, 1, 10, 0, 0)).await;

    let year = FiscalYear::new(2025).unwrap();
    let church_id = ChurchId::from_uuid(church.id);
    let (records, donors) = repo.donations_for_year(church_id, year).await.unwrap();
    let totals = DonorAggregator::aggregate(church_id, year, &records, &donors);
    let declaration = Declaration::partition(totals, TaxCountry::Portugal);

    assert_eq!(declaration.valid.len(), 1);
    assert_eq!(declaration.excluded.len(), 1);
    assert_eq!(declaration.excluded[0].donor.display_name, "Bruno");
    assert_eq!(declaration.stats.total_amount, dec!(125.25));
    assert_eq!(declaration.stats.excluded_amount, dec!(10.00));
}

#[tokio::test]
async fn test_unknown_church_has_no_donations() {
    let db = setup().await;
    let repo = ContributionRepository::new(db.clone());

    let (records, donors) = repo
        .donations_for_year(ChurchId::new(), FiscalYear::new(2025).unwrap())
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(donors.is_empty());
}

#[tokio::test]
async fn test_create_rejects_sub_cent_amounts() {
    let db = setup().await;
    let church = create_church(&db, "Igreja Central").await;
    let repo = ContributionRepository::new(db.clone());

    let err = repo
        .create(NewContribution {
            church_id: church.id,
            member_id: None,
            kind: ContributionKind::Income,
            category: "oferta".to_string(),
            amount: dec!(1.005),
            description: None,
            occurred_at: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::InvalidAmount(_)));
}

#[tokio::test]
async fn test_create_rejects_member_of_another_church() {
    let db = setup().await;
    let church = create_church(&db, "Igreja Central").await;
    let other = create_church(&db, "Igreja Norte").await;
    let outsider = create_member(&db, other.id, "Rui", None).await;
    let repo = ContributionRepository::new(db.clone());

    let err = repo
        .create(NewContribution {
            church_id: church.id,
            member_id: Some(outsider.id),
            kind: ContributionKind::Income,
            category: "oferta".to_string(),
            amount: dec!(5),
            description: None,
            occurred_at: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::MemberNotFound(id) if id == outsider.id));
}

#[tokio::test]
async fn test_set_receipt_key() {
    let db = setup().await;
    let church = create_church(&db, "Igreja Central").await;
    let repo = ContributionRepository::new(db.clone());

    let created = repo
        .create(NewContribution {
            church_id: church.id,
            member_id: None,
            kind: ContributionKind::Income,
            category: "oferta".to_string(),
            amount: dec!(20.50),
            description: Some("Culto de domingo".to_string()),
            occurred_at: at(2025, 3, 2, 11, 0, 0),
        })
        .await
        .unwrap();
    assert_eq!(created.amount_cents, 2050);
    assert_eq!(created.receipt_key, None);

    repo.set_receipt_key(created.id, "receipts/x/recibo.pdf")
        .await
        .unwrap();

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.receipt_key.as_deref(), Some("receipts/x/recibo.pdf"));
}
