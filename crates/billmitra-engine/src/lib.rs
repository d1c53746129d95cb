//! # billmitra-engine - Invoice Lifecycle Engine
//!
//! Orchestration layer between the pure core and the database.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        billmitra-engine                                 │
//! │                                                                         │
//! │  ┌───────────────┐  ┌────────────────────┐  ┌──────────────────────┐   │
//! │  │   counter.rs  │  │    finalize.rs     │  │      backup.rs       │   │
//! │  │               │  │                    │  │                      │   │
//! │  │ CounterStore  │  │  BillingEngine     │  │  BackupService       │   │
//! │  │ InvoiceCounter│◀─│  reserve → render  │  │  export / import     │   │
//! │  │ reserve/commit│  │  → commit → stock  │  │  JSON bundles        │   │
//! │  └───────────────┘  │  → persist         │  └──────────────────────┘   │
//! │         │           └────────────────────┘             │               │
//! │         ▼                      │                       ▼               │
//! │  billmitra-db (CounterRepository, InvoiceRepository, ...)              │
//! │                                │                                        │
//! │                                ▼                                        │
//! │  billmitra-core (compute_invoice_totals, number_to_words, ...)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Reserve-Then-Commit Contract
//! An invoice number is only burned once its artifact exists. `next()`
//! peeks, `commit()` advances; the finalize flow calls them around the
//! renderer so a failed render never leaves a gap in the legal sequence.

pub mod backup;
pub mod counter;
pub mod error;
pub mod finalize;

// Re-export main types for convenient access
pub use backup::{BackupBundle, BackupService, CounterEntry, BACKUP_VERSION};
pub use counter::{
    CounterStore, InMemoryCounterStore, InvoiceCounter, ReservedNumber, SqliteCounterStore,
};
pub use error::{EngineError, EngineResult, StockShortage};
pub use finalize::{
    BillingEngine, DraftLine, FinalizedInvoice, InvoiceDraft, InvoiceRenderer, RenderedInvoice,
};
