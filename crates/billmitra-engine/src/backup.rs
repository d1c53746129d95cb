//! # Backup Bundles
//!
//! JSON export and import of everything needed to move BillMitra to a new
//! device: settings, catalog, outlets and counters.
//!
//! ## Shape
//! ```json
//! {
//!   "version": 1,
//!   "exported_at": "2026-08-25T10:30:00Z",
//!   "settings": { ... },
//!   "products": [ ... ],
//!   "outlets": [ ... ],
//!   "counters": [ { "prefix": "KTC", "last_number": 42 } ]
//! }
//! ```
//! Import REPLACES the target tables (last write wins). Invoices are not
//! bundled; they are legal records tied to the device that issued them.
//! How the JSON travels (file share, cloud drive) is the caller's problem.

use billmitra_core::{CompanySettings, Outlet, Product};
use billmitra_db::Database;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, EngineResult};

/// The current bundle format version.
pub const BACKUP_VERSION: u32 = 1;

/// One counter row in a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterEntry {
    pub prefix: String,
    pub last_number: i64,
}

/// A complete portable snapshot of the configuration and catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupBundle {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub settings: CompanySettings,
    pub products: Vec<Product>,
    pub outlets: Vec<Outlet>,
    pub counters: Vec<CounterEntry>,
}

/// Export/import over a database handle.
#[derive(Debug, Clone)]
pub struct BackupService {
    db: Database,
}

impl BackupService {
    pub fn new(db: Database) -> Self {
        BackupService { db }
    }

    /// Reads every repository into a bundle.
    ///
    /// Soft-deleted products are included so a restore doesn't resurrect
    /// them as active.
    pub async fn export(&self) -> EngineResult<BackupBundle> {
        let settings = self.db.settings().get().await?;
        let products = self.db.products().list_all().await?;
        let outlets = self.db.outlets().list().await?;
        let counters = self
            .db
            .counters()
            .all()
            .await?
            .into_iter()
            .map(|(prefix, last_number)| CounterEntry {
                prefix,
                last_number,
            })
            .collect::<Vec<_>>();

        info!(
            products = products.len(),
            outlets = outlets.len(),
            counters = counters.len(),
            "Backup exported"
        );

        Ok(BackupBundle {
            version: BACKUP_VERSION,
            exported_at: Utc::now(),
            settings,
            products,
            outlets,
            counters,
        })
    }

    /// Exports straight to pretty-printed JSON.
    pub async fn export_json(&self) -> EngineResult<String> {
        let bundle = self.export().await?;
        Ok(serde_json::to_string_pretty(&bundle)?)
    }

    /// Replaces settings, catalog, outlets and counters with the bundle's
    /// contents. Existing rows in those tables are dropped first.
    pub async fn import(&self, bundle: &BackupBundle) -> EngineResult<()> {
        if bundle.version != BACKUP_VERSION {
            return Err(EngineError::UnsupportedBackupVersion {
                found: bundle.version,
                expected: BACKUP_VERSION,
            });
        }

        self.db.settings().save(&bundle.settings).await?;

        let products = self.db.products();
        products.delete_all().await?;
        for product in &bundle.products {
            products.restore(product).await?;
        }

        let outlets = self.db.outlets();
        outlets.delete_all().await?;
        for outlet in &bundle.outlets {
            outlets.restore(outlet).await?;
        }

        let counters = self.db.counters();
        for (prefix, _) in counters.all().await? {
            counters.delete(&prefix).await?;
        }
        for entry in &bundle.counters {
            counters.set(&entry.prefix, entry.last_number).await?;
        }

        info!(
            products = bundle.products.len(),
            outlets = bundle.outlets.len(),
            counters = bundle.counters.len(),
            "Backup imported"
        );
        Ok(())
    }

    /// Parses and imports a JSON bundle.
    pub async fn import_json(&self, json: &str) -> EngineResult<()> {
        let bundle: BackupBundle = serde_json::from_str(json)?;
        self.import(&bundle).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use billmitra_db::DbConfig;

    async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut settings = CompanySettings::default();
        settings.name = "Kumar Trading Company".to_string();
        settings.invoice_prefix = "KTC".to_string();
        db.settings().save(&settings).await.unwrap();

        let mut product = Product::sample("Detergent Bar", 100.0, 18.0);
        product.stock = Some(12.0);
        db.products().insert(product).await.unwrap();

        db.outlets()
            .insert(Outlet {
                id: String::new(),
                name: "Corner Store".to_string(),
                address: "MG Road".to_string(),
                gst_no: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        db.counters().set("KTC", 42).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_export_captures_everything() {
        let db = seeded_db().await;
        let bundle = BackupService::new(db).export().await.unwrap();

        assert_eq!(bundle.version, BACKUP_VERSION);
        assert_eq!(bundle.settings.name, "Kumar Trading Company");
        assert_eq!(bundle.products.len(), 1);
        assert_eq!(bundle.outlets.len(), 1);
        assert_eq!(
            bundle.counters,
            vec![CounterEntry {
                prefix: "KTC".to_string(),
                last_number: 42
            }]
        );
    }

    #[tokio::test]
    async fn test_round_trip_to_fresh_database() {
        let source = BackupService::new(seeded_db().await);
        let json = source.export_json().await.unwrap();

        let target_db = Database::new(DbConfig::in_memory()).await.unwrap();
        let target = BackupService::new(target_db.clone());
        target.import_json(&json).await.unwrap();

        let settings = target_db.settings().get().await.unwrap();
        assert_eq!(settings.invoice_prefix, "KTC");
        assert_eq!(target_db.products().count().await.unwrap(), 1);
        assert_eq!(target_db.outlets().count().await.unwrap(), 1);
        assert_eq!(target_db.counters().get("KTC").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_import_replaces_existing_rows() {
        let source = BackupService::new(seeded_db().await);
        let bundle = source.export().await.unwrap();

        // Target has its own catalog that should disappear on import.
        let target_db = Database::new(DbConfig::in_memory()).await.unwrap();
        target_db
            .products()
            .insert(Product::sample("Stale Item", 10.0, 5.0))
            .await
            .unwrap();
        target_db.counters().set("OLD", 7).await.unwrap();

        BackupService::new(target_db.clone())
            .import(&bundle)
            .await
            .unwrap();

        let products = target_db.products().list_all().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Detergent Bar");
        assert_eq!(target_db.counters().get("OLD").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_preserves_ids_and_timestamps() {
        let source_db = seeded_db().await;
        let original = source_db.products().list_all().await.unwrap().remove(0);

        let bundle = BackupService::new(source_db.clone()).export().await.unwrap();

        let target_db = Database::new(DbConfig::in_memory()).await.unwrap();
        BackupService::new(target_db.clone())
            .import(&bundle)
            .await
            .unwrap();

        let restored = target_db.products().get_by_id(&original.id).await.unwrap();
        assert_eq!(restored.created_at, original.created_at);
        assert_eq!(restored.stock, Some(12.0));
    }

    #[tokio::test]
    async fn test_unknown_version_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = BackupService::new(db);

        let mut bundle = service.export().await.unwrap();
        bundle.version = 99;

        let result = service.import(&bundle).await;
        assert!(matches!(
            result,
            Err(EngineError::UnsupportedBackupVersion {
                found: 99,
                expected: BACKUP_VERSION
            })
        ));
    }
}
