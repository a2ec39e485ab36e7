//! Database seeder for Atelier development and testing.
//!
//! Seeds default settings, a demo client, a demo quotation, and a bank
//! account for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use atelier_core::pricing::{Calculator, QuotationItem};
use atelier_core::settings::{GeneralSettings, SettingsDocument, TaxSettings};
use atelier_db::entities::{bank_accounts, clients, quotations, sea_orm_active_enums};
use atelier_db::repositories::SettingsRepository;

/// Demo client ID (consistent for all seeds)
const DEMO_CLIENT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo quotation ID (consistent for all seeds)
const DEMO_QUOTATION_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo bank account ID (consistent for all seeds)
const DEMO_BANK_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = atelier_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding settings...");
    seed_settings(&db).await;

    println!("Seeding demo client...");
    seed_demo_client(&db).await;

    println!("Seeding demo quotation...");
    seed_demo_quotation(&db).await;

    println!("Seeding bank account...");
    seed_bank_account(&db).await;

    println!("Seeding complete!");
}

fn demo_client_id() -> Uuid {
    Uuid::parse_str(DEMO_CLIENT_ID).unwrap()
}

fn demo_quotation_id() -> Uuid {
    Uuid::parse_str(DEMO_QUOTATION_ID).unwrap()
}

fn demo_bank_account_id() -> Uuid {
    Uuid::parse_str(DEMO_BANK_ACCOUNT_ID).unwrap()
}

/// Seeds the settings singletons with development defaults.
async fn seed_settings(db: &DatabaseConnection) {
    let repo = SettingsRepository::new(db.clone());

    let tax = TaxSettings {
        tax_label: "GST".to_string(),
        tax_percent: Decimal::from(18),
        tax_id: "29ABCDE1234F1Z5".to_string(),
        service_tax_enabled: false,
        ..TaxSettings::default()
    };
    repo.put(&SettingsDocument::Tax(tax))
        .await
        .expect("Failed to seed tax settings");

    repo.put(&SettingsDocument::General(GeneralSettings::default()))
        .await
        .expect("Failed to seed general settings");
}

/// Seeds a demo client for development.
async fn seed_demo_client(db: &DatabaseConnection) {
    if clients::Entity::find_by_id(demo_client_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo client already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let client = clients::ActiveModel {
        id: Set(demo_client_id()),
        name: Set("Meera Kapoor".to_string()),
        email: Set(Some("meera@example.com".to_string())),
        phone: Set(Some("+91 98765 43210".to_string())),
        address: Set(Some("14 Residency Road, Bengaluru".to_string())),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    client.insert(db).await.expect("Failed to seed demo client");
}

/// Seeds a demo quotation priced with the seeded tax settings.
async fn seed_demo_quotation(db: &DatabaseConnection) {
    if quotations::Entity::find_by_id(demo_quotation_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo quotation already exists, skipping...");
        return;
    }

    let items = vec![
        QuotationItem {
            description: "Modular kitchen with island counter".to_string(),
            amount: Decimal::from(450_000),
        },
        QuotationItem {
            description: "Master bedroom wardrobe".to_string(),
            amount: Decimal::from(180_000),
        },
        QuotationItem {
            description: "Living room false ceiling".to_string(),
            amount: Decimal::from(95_000),
        },
    ];

    let repo = SettingsRepository::new(db.clone());
    let tax = repo.get_tax().await.expect("Failed to load tax settings");
    let totals = Calculator::quotation_totals(&items, Some(&tax.to_tax_config()))
        .expect("Failed to compute totals");

    let now = Utc::now().into();
    let quotation = quotations::ActiveModel {
        id: Set(demo_quotation_id()),
        quotation_number: Set("QT-2026-0001".to_string()),
        client_id: Set(demo_client_id()),
        date: Set(Utc::now().date_naive()),
        items: Set(serde_json::to_value(&items).expect("Failed to encode items")),
        currency: Set("INR".to_string()),
        subtotal: Set(totals.subtotal),
        total_discount: Set(totals.total_discount),
        tax_label: Set(totals.tax_label),
        tax_percent: Set(totals.tax_percent),
        tax_amount: Set(totals.tax_amount),
        service_tax_label: Set(totals.service_tax_label),
        service_tax_percent: Set(totals.service_tax_percent),
        service_tax_amount: Set(totals.service_tax_amount),
        total_amount: Set(totals.total_amount),
        status: Set(sea_orm_active_enums::QuotationStatus::Performa),
        paid_amount: Set(Decimal::ZERO),
        notes: Set(Some("Phase 1 of the Kapoor residence".to_string())),
        version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };
    quotation
        .insert(db)
        .await
        .expect("Failed to seed demo quotation");

    // Keep the quotation counter ahead of the seeded number.
    use chrono::Datelike;
    use sea_orm::{ConnectionTrait, DbBackend, Statement};
    db.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        r"
        INSERT INTO document_counters (doc_class, year, last_value)
        VALUES ('quotation', $1, 1)
        ON CONFLICT (doc_class, year) DO NOTHING
        ",
        [Utc::now().date_naive().year().into()],
    ))
    .await
    .expect("Failed to seed quotation counter");
}

/// Seeds a default bank account for invoice printing.
async fn seed_bank_account(db: &DatabaseConnection) {
    if bank_accounts::Entity::find_by_id(demo_bank_account_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Bank account already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let account = bank_accounts::ActiveModel {
        id: Set(demo_bank_account_id()),
        account_name: Set("Atelier Interiors LLP".to_string()),
        bank_name: Set("HDFC Bank".to_string()),
        account_number: Set("50200012345678".to_string()),
        ifsc_code: Set(Some("HDFC0000123".to_string())),
        branch: Set(Some("Indiranagar".to_string())),
        is_default: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    account
        .insert(db)
        .await
        .expect("Failed to seed bank account");
}
