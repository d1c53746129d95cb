//! # Database Seeder
//!
//! Populates a development database with a sample catalog, outlets and
//! company settings.
//!
//! ## Usage
//! ```bash
//! cargo run --bin seed                       # seeds ./billmitra-dev.db
//! DATABASE_PATH=/tmp/demo.db cargo run --bin seed
//! ```
//!
//! Running twice duplicates products; delete the file for a fresh start.

use billmitra_core::{CompanySettings, Outlet, Product};
use billmitra_db::{Database, DbConfig};
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "billmitra-dev.db".to_string());
    info!(path = %path, "Seeding development database");

    let db = Database::new(DbConfig::new(&path)).await?;

    seed_settings(&db).await?;
    seed_products(&db).await?;
    seed_outlets(&db).await?;

    info!(
        products = db.products().count().await?,
        outlets = db.outlets().count().await?,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

async fn seed_settings(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = CompanySettings::default();
    settings.name = "Kumar Trading Company".to_string();
    settings.address1 = "Shop 14, Gandhi Market".to_string();
    settings.address2 = "Near Bus Stand".to_string();
    settings.city = "Kochi".to_string();
    settings.state = "Kerala".to_string();
    settings.state_code = "32".to_string();
    settings.pincode = "682001".to_string();
    settings.gstin = "32AAACK1234F1Z5".to_string();
    settings.mobile1 = "9847012345".to_string();
    settings.email = "kumartrading@example.com".to_string();
    settings.bank_details.account_holder = "Kumar Trading Company".to_string();
    settings.bank_details.bank_name = "State Bank of India".to_string();
    settings.bank_details.account_number = "30123456789".to_string();
    settings.bank_details.branch = "Kochi Main".to_string();
    settings.bank_details.ifsc_code = "SBIN0001234".to_string();
    settings.invoice_prefix = "KTC".to_string();

    db.settings().save(&settings).await?;
    info!("Company settings seeded");
    Ok(())
}

async fn seed_products(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    // (name, hsn, price, gst%, unit, stock)
    let catalog: &[(&str, &str, f64, f64, &str, Option<f64>)] = &[
        ("Detergent Bar 250g", "3401", 100.0, 18.0, "PCS", Some(240.0)),
        ("Detergent Powder 1kg", "3402", 185.0, 18.0, "PCS", Some(96.0)),
        ("Dish Wash Liquid 500ml", "3402", 99.0, 18.0, "BTL", Some(60.0)),
        ("Toilet Cleaner 1L", "3402", 152.0, 18.0, "BTL", Some(48.0)),
        ("Basmati Rice", "1006", 95.0, 5.0, "KG", Some(500.0)),
        ("Toor Dal", "0713", 140.0, 5.0, "KG", Some(300.0)),
        ("Refined Sunflower Oil 1L", "1512", 155.0, 5.0, "BTL", Some(120.0)),
        ("Packaged Drinking Water 1L", "2201", 20.0, 18.0, "BTL", Some(600.0)),
        ("Delivery Charge", "9965", 50.0, 18.0, "TRIP", None),
    ];

    let repo = db.products();
    for &(name, hsn, price, gst, unit, stock) in catalog {
        let now = Utc::now();
        repo.insert(Product {
            id: String::new(),
            name: name.to_string(),
            hsn_code: hsn.to_string(),
            base_price: price,
            gst_rate: gst,
            unit: unit.to_string(),
            stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await?;
    }

    info!(count = catalog.len(), "Products seeded");
    Ok(())
}

async fn seed_outlets(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let outlets: &[(&str, &str, Option<&str>)] = &[
        (
            "Sharma General Store",
            "22 MG Road, Kochi, Kerala 682016",
            Some("32AAPFS0939F1ZV"),
        ),
        (
            "Nair Supermarket",
            "Plot 4, Industrial Estate, Aluva, Kerala 683101",
            Some("32AABCN5678G1Z2"),
        ),
        ("Cash Customer", "Walk-in", None),
    ];

    let repo = db.outlets();
    for &(name, address, gst_no) in outlets {
        let now = Utc::now();
        repo.insert(Outlet {
            id: String::new(),
            name: name.to_string(),
            address: address.to_string(),
            gst_no: gst_no.map(|g| g.to_string()),
            created_at: now,
            updated_at: now,
        })
        .await?;
    }

    info!(count = outlets.len(), "Outlets seeded");
    Ok(())
}
