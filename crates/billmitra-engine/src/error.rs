//! # Engine Error Types
//!
//! Errors for invoice lifecycle orchestration.

use billmitra_core::{CoreError, ValidationError};
use billmitra_db::DbError;
use thiserror::Error;

/// Errors from the invoice lifecycle engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business rule violation from the core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Input validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// One or more lines bill more than the available stock.
    ///
    /// Every short line is collected before failing, so the operator can
    /// fix the whole draft in one pass instead of replaying the error.
    #[error("Insufficient stock: {}", shortage_summary(.0))]
    InsufficientStock(Vec<StockShortage>),

    /// No invoice prefix configured in company settings.
    ///
    /// Finalization refuses to number invoices with an empty prefix;
    /// the fix is one visit to the settings screen.
    #[error("No invoice prefix configured in company settings")]
    PrefixNotConfigured,

    /// Invoice artifact rendering failed.
    ///
    /// The reserved number was NOT committed; the next attempt reuses it.
    #[error("Invoice rendering failed: {0}")]
    Render(String),

    /// The artifact was produced but the counter commit failed afterwards.
    ///
    /// ## Recovery
    /// The artifact for `full_invoice_number` exists but the counter still
    /// points at the previous number. The operator must either retry the
    /// commit or discard the artifact; doing nothing risks a duplicate
    /// number on the next invoice.
    #[error("Invoice {full_invoice_number} rendered but counter commit failed: {source}")]
    CounterCommitFailed {
        full_invoice_number: String,
        #[source]
        source: DbError,
    },

    /// Backup bundle could not be serialized or parsed.
    #[error("Backup serialization failed: {0}")]
    BackupSerialization(#[from] serde_json::Error),

    /// Backup bundle has a version this build does not understand.
    #[error("Unsupported backup version {found} (expected {expected})")]
    UnsupportedBackupVersion { found: u32, expected: u32 },
}

/// One line of a draft that bills more than the available stock.
#[derive(Debug, Clone, PartialEq)]
pub struct StockShortage {
    pub product_name: String,
    pub available: f64,
    pub requested: f64,
}

fn shortage_summary(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(|s| {
            format!(
                "{} (available {}, requested {})",
                s.product_name, s.available, s.requested
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
