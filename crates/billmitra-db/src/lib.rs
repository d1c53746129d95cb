//! # billmitra-db - Database Layer
//!
//! SQLite persistence for BillMitra using sqlx.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          billmitra-db                                   │
//! │                                                                         │
//! │  ┌──────────────┐    ┌──────────────────────────────────────────────┐  │
//! │  │   pool.rs    │    │              repository/                      │  │
//! │  │              │    │                                               │  │
//! │  │  DbConfig    │───▶│  ProductRepository    (catalog + stock)       │  │
//! │  │  Database    │    │  OutletRepository     (customer outlets)      │  │
//! │  └──────────────┘    │  SettingsRepository   (single-row settings)   │  │
//! │         │            │  CounterRepository    (invoice counters)      │  │
//! │         ▼            │  InvoiceRepository    (invoices + items)      │  │
//! │  ┌──────────────┐    └──────────────────────────────────────────────┘  │
//! │  │migrations.rs │                                                      │
//! │  │ (embedded)   │    All rows map back to billmitra-core types.        │
//! │  └──────────────┘                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use billmitra_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("billmitra.db")).await?;
//! let products = db.products().list_active().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// Re-export main types for convenient access
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::counter::CounterRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::outlet::OutletRepository;
pub use repository::product::ProductRepository;
pub use repository::settings::SettingsRepository;
