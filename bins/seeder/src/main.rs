//! Database seeder for Ecclesia development and testing.
//!
//! Seeds one church, a handful of members and a year of tithes so every
//! declaration variant has something to print. Also prints a treasurer token
//! for trying the API by hand.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, TimeZone, Utc};
use ecclesia_core::fiscal::ContributionKind;
use ecclesia_db::{
    ContributionRepository, NewContribution,
    entities::{churches, members},
};
use ecclesia_shared::{JwtConfig, JwtService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Seeded church ID (consistent for all seeds)
const CHURCH_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Seeded treasurer ID
const TREASURER_ID: &str = "00000000-0000-0000-0000-000000000002";

/// (id, name, tax id, monthly tithe). Bruno's number is the blank-form
/// placeholder and Carla has none, so both land in the excluded list.
const DONORS: [(&str, &str, Option<&str>, Decimal); 4] = [
    ("00000000-0000-0000-0000-000000000010", "Ana Costa", Some("123456789"), dec!(50.00)),
    ("00000000-0000-0000-0000-000000000011", "Bruno Lima", Some("000000000"), dec!(10.00)),
    ("00000000-0000-0000-0000-000000000012", "Carla Dias", None, dec!(25.50)),
    ("00000000-0000-0000-0000-000000000013", "Duarte Sousa", Some("PT 980 000 009"), dec!(120.00)),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = ecclesia_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding church...");
    let created = seed_church(&db).await;

    println!("Seeding members...");
    seed_members(&db).await;

    if created {
        println!("Seeding contributions...");
        seed_contributions(&db).await;
    } else {
        println!("  Church already seeded, skipping contributions...");
    }

    if let Ok(secret) = std::env::var("ECCLESIA__JWT__SECRET") {
        let jwt = JwtService::new(JwtConfig {
            secret,
            token_expires_minutes: 24 * 60,
        });
        match jwt.issue_token(uuid(TREASURER_ID), uuid(CHURCH_ID), "treasurer") {
            Ok(token) => println!("Treasurer token (24h): {token}"),
            Err(e) => eprintln!("Failed to issue token: {e}"),
        }
    }

    println!("Seeding complete!");
}

fn uuid(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap()
}

/// Seeds the test church. Returns false if it already existed.
async fn seed_church(db: &DatabaseConnection) -> bool {
    if churches::Entity::find_by_id(uuid(CHURCH_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Church already exists, skipping...");
        return false;
    }

    let church = churches::ActiveModel {
        id: Set(uuid(CHURCH_ID)),
        name: Set("Igreja Evangélica Central".to_string()),
        nif: Set(Some("501964843".to_string())),
        address: Set(Some("Rua das Flores 10".to_string())),
        city: Set(Some("Lisboa".to_string())),
        country: Set(Some("Portugal".to_string())),
        currency_symbol: Set("€".to_string()),
        created_at: Set(Utc::now()),
    };

    match church.insert(db).await {
        Ok(_) => {
            println!("  Created church: Igreja Evangélica Central");
            true
        }
        Err(e) => {
            eprintln!("Failed to insert church: {e}");
            false
        }
    }
}

/// Seeds the treasurer and the donors.
async fn seed_members(db: &DatabaseConnection) {
    let treasurer = (TREASURER_ID, "Tesoureiro", None, "treasurer");
    let donors = DONORS
        .iter()
        .map(|(id, name, tax_id, _)| (*id, *name, *tax_id, "member"));

    for (id, name, tax_id, role) in std::iter::once(treasurer).chain(donors) {
        if members::Entity::find_by_id(uuid(id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            continue;
        }

        let member = members::ActiveModel {
            id: Set(uuid(id)),
            church_id: Set(uuid(CHURCH_ID)),
            name: Set(name.to_string()),
            email: Set(None),
            tax_id: Set(tax_id.map(str::to_string)),
            address: Set(None),
            role: Set(role.to_string()),
            status: Set("active".to_string()),
            created_at: Set(Utc::now()),
        };

        if let Err(e) = member.insert(db).await {
            eprintln!("Failed to insert member {name}: {e}");
        } else {
            println!("  Created member: {name} ({role})");
        }
    }
}

/// Seeds a monthly tithe per donor for last year, plus one anonymous offering
/// and one expense that the declaration must ignore.
async fn seed_contributions(db: &DatabaseConnection) {
    let repo = ContributionRepository::new(db.clone());
    let year = Utc::now().year() - 1;
    let mut inserted = 0;

    for month in 1..=12 {
        let occurred_at = Utc.with_ymd_and_hms(year, month, 5, 10, 0, 0).unwrap();

        for (id, _, _, amount) in &DONORS {
            let result = repo
                .create(NewContribution {
                    church_id: uuid(CHURCH_ID),
                    member_id: Some(uuid(id)),
                    kind: ContributionKind::Income,
                    category: "dizimo".to_string(),
                    amount: *amount,
                    description: None,
                    occurred_at,
                })
                .await;

            match result {
                Ok(_) => inserted += 1,
                Err(e) => eprintln!("Failed to insert contribution: {e}"),
            }
        }
    }

    let extras = [
        (None, ContributionKind::Income, "oferta", dec!(35.00)),
        (None, ContributionKind::Expense, "manutencao", dec!(300.00)),
    ];
    for (member_id, kind, category, amount) in extras {
        let result = repo
            .create(NewContribution {
                church_id: uuid(CHURCH_ID),
                member_id,
                kind,
                category: category.to_string(),
                amount,
                description: Some("seeder".to_string()),
                occurred_at: Utc.with_ymd_and_hms(year, 6, 15, 11, 0, 0).unwrap(),
            })
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(e) => eprintln!("Failed to insert contribution: {e}"),
        }
    }

    println!("  Created {inserted} contributions for {year}");
}
