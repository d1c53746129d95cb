//! # Repository Pattern Implementation
//!
//! Each repository owns the SQL for one aggregate and returns
//! billmitra-core types. Repositories are cheap to construct: they
//! hold a clone of the pool handle, nothing else.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Engine / App code                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.products() ──▶ ProductRepository ──▶ SQL ──▶ Product (core type)   │
//! │  db.invoices() ──▶ InvoiceRepository ──▶ SQL ──▶ Invoice (core type)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod counter;
pub mod invoice;
pub mod outlet;
pub mod product;
pub mod settings;
