//! # Invoice Finalization
//!
//! The one flow that turns a draft into a numbered, persisted invoice.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  finalize(draft)                        (one at a time, engine lock)   │
//! │                                                                         │
//! │  1. load settings        → refuse if no invoice prefix configured      │
//! │  2. load outlet + products                                             │
//! │  3. validate quantities + discount                                     │
//! │  4. stock check          → collect EVERY short line, fail as one       │
//! │  5. compute totals                                                     │
//! │  6. reserve number       → counter.next(), NOT stored yet              │
//! │  7. assemble Invoice     → amount in words from grand total            │
//! │  8. render artifact      ── failure? return; number re-offered later   │
//! │  9. commit counter       ── failure? reconciliation error, no retry    │
//! │ 10. deduct stock                                                       │
//! │ 11. persist invoice + items (one transaction)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Steps 8 and 9 define the reserve-then-commit contract: a failed render
//! burns nothing, a committed number always has an artifact behind it.

use billmitra_core::calculate::compute_invoice_totals;
use billmitra_core::invoice_number;
use billmitra_core::validation::{validate_discount, validate_quantity};
use billmitra_core::words::number_to_words;
use billmitra_core::{DiscountType, Invoice, InvoiceItem, ValidationError};
use billmitra_db::Database;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::counter::{CounterStore, InvoiceCounter};
use crate::error::{EngineError, EngineResult, StockShortage};

// =============================================================================
// Renderer Seam
// =============================================================================

/// A rendered invoice artifact (typically a PDF, but the engine doesn't care).
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    /// Suggested file name, e.g. "KTC-42.pdf".
    pub file_name: String,
    /// The artifact bytes.
    pub bytes: Vec<u8>,
}

/// Produces the invoice artifact during finalization.
///
/// Injected so the engine can be tested without a PDF toolchain and so
/// render failures can be simulated. Implementations return
/// [`EngineError::Render`] on failure.
#[async_trait::async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render(&self, invoice: &Invoice) -> EngineResult<RenderedInvoice>;
}

// =============================================================================
// Draft
// =============================================================================

/// One line of a draft invoice, referencing the catalog by ID.
///
/// The engine loads the product itself so the snapshot and stock check
/// always see the current catalog row, not whatever the UI cached.
#[derive(Debug, Clone)]
pub struct DraftLine {
    pub product_id: String,
    /// Physically counted quantity (informational).
    pub actual_quantity: f64,
    /// Quantity actually charged.
    pub billed_quantity: f64,
    /// Price override; `None` bills at the product's base price.
    pub unit_price: Option<f64>,
}

/// A draft invoice as assembled on the billing screen.
///
/// Drafts live in memory only; nothing is persisted until `finalize`.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub outlet_id: String,
    pub lines: Vec<DraftLine>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub enable_round_off: bool,
}

/// The result of a successful finalization.
#[derive(Debug)]
pub struct FinalizedInvoice {
    pub invoice: Invoice,
    pub artifact: RenderedInvoice,
}

// =============================================================================
// Billing Engine
// =============================================================================

/// Orchestrates the invoice lifecycle over the database and counter.
pub struct BillingEngine<S: CounterStore, R: InvoiceRenderer> {
    db: Database,
    counter: InvoiceCounter<S>,
    renderer: R,
    /// Serializes whole finalize runs so reserve→render→commit never
    /// interleaves between two local tasks.
    finalize_lock: Mutex<()>,
}

impl<S: CounterStore, R: InvoiceRenderer> BillingEngine<S, R> {
    pub fn new(db: Database, counter: InvoiceCounter<S>, renderer: R) -> Self {
        BillingEngine {
            db,
            counter,
            renderer,
            finalize_lock: Mutex::new(()),
        }
    }

    /// Read access to the counter for admin screens.
    pub fn counter(&self) -> &InvoiceCounter<S> {
        &self.counter
    }

    /// Finalizes a draft into a numbered, rendered, persisted invoice.
    pub async fn finalize(&self, draft: InvoiceDraft) -> EngineResult<FinalizedInvoice> {
        let _guard = self.finalize_lock.lock().await;

        // 1. Settings gate: no prefix, no numbering.
        let settings = self.db.settings().get().await?;
        if settings.invoice_prefix.is_empty() {
            return Err(EngineError::PrefixNotConfigured);
        }

        if draft.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "invoice items".to_string(),
            }
            .into());
        }

        // 2. Load outlet and products; 3. validate; build line items.
        let outlet = self.db.outlets().get_by_id(&draft.outlet_id).await?;

        let mut items = Vec::with_capacity(draft.lines.len());
        let mut shortages = Vec::new();

        for line in &draft.lines {
            validate_quantity(line.billed_quantity)?;

            let product = self.db.products().get_by_id(&line.product_id).await?;
            let unit_price = line.unit_price.unwrap_or(product.base_price);

            // 4. Stock check, collecting every short line before failing.
            if !product.has_stock_for(line.billed_quantity) {
                shortages.push(StockShortage {
                    product_name: product.name.clone(),
                    available: product.stock.unwrap_or(0.0),
                    requested: line.billed_quantity,
                });
                continue;
            }

            items.push(InvoiceItem::compute(
                Uuid::new_v4().to_string(),
                product,
                line.actual_quantity,
                line.billed_quantity,
                unit_price,
            ));
        }

        if !shortages.is_empty() {
            return Err(EngineError::InsufficientStock(shortages));
        }

        let raw_subtotal: f64 = items.iter().map(|i| i.taxable_amount).sum();
        validate_discount(draft.discount_type, draft.discount_value, raw_subtotal)?;

        // 5. Totals.
        let totals = compute_invoice_totals(
            &items,
            draft.discount_type,
            draft.discount_value,
            draft.enable_round_off,
        );

        // 6. Reserve a number. Nothing is stored yet.
        let reserved = self.counter.next(&settings.invoice_prefix).await?;

        // 7. Assemble.
        let mut invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number: reserved.number.to_string(),
            invoice_prefix: reserved.prefix.clone(),
            full_invoice_number: reserved.full_number.clone(),
            date: Utc::now(),
            outlet_name: outlet.name,
            outlet_address: outlet.address,
            customer_gst_no: outlet.gst_no,
            state: settings.state.clone(),
            state_code: settings.state_code.clone(),
            items,
            discount_type: draft.discount_type,
            discount_value: draft.discount_value,
            subtotal: 0.0,
            discount_amount: 0.0,
            subtotal_after_discount: 0.0,
            total_cgst: 0.0,
            total_sgst: 0.0,
            total_tax: 0.0,
            total_before_round_off: 0.0,
            round_off: 0.0,
            grand_total: 0.0,
            amount_in_words: String::new(),
        };
        invoice.apply_totals(&totals);
        invoice.amount_in_words = number_to_words(invoice.grand_total);

        // 8. Render. On failure the reserved number was never stored, so
        //    the next attempt re-offers it.
        let artifact = match self.renderer.render(&invoice).await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!(
                    number = %invoice.full_invoice_number,
                    error = %e,
                    "Render failed, number not committed"
                );
                return Err(e);
            }
        };

        // 9. Commit the number. A failure here leaves an artifact without a
        //    committed number and needs operator attention.
        if let Err(e) = self.counter.commit(&reserved.prefix).await {
            let source = match e {
                EngineError::Db(db) => db,
                other => return Err(other),
            };
            return Err(EngineError::CounterCommitFailed {
                full_invoice_number: invoice.full_invoice_number,
                source,
            });
        }

        // 10. Deduct stock (clamped at zero by the repository).
        for item in &invoice.items {
            self.db
                .products()
                .adjust_stock(&item.product.id, -item.billed_quantity)
                .await?;
        }

        // 11. Persist.
        self.db.invoices().insert(&invoice).await?;

        info!(
            number = %invoice.full_invoice_number,
            grand_total = invoice.grand_total,
            "Invoice finalized"
        );

        Ok(FinalizedInvoice { invoice, artifact })
    }

    /// Deletes a persisted invoice and restores the stock it deducted.
    pub async fn delete_invoice(&self, id: &str) -> EngineResult<Invoice> {
        let invoice = self.db.invoices().delete(id).await?;

        for item in &invoice.items {
            // Products hard-deleted since the invoice was written just skip.
            match self
                .db
                .products()
                .adjust_stock(&item.product.id, item.billed_quantity)
                .await
            {
                Ok(_) => {}
                Err(billmitra_db::DbError::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }

        info!(number = %invoice.full_invoice_number, "Invoice deleted, stock restored");
        Ok(invoice)
    }
}

/// Formats the conventional artifact file name for an invoice.
pub fn artifact_file_name(invoice: &Invoice) -> String {
    format!(
        "{}.pdf",
        invoice_number::format_invoice_number(
            &invoice.invoice_prefix,
            invoice
                .invoice_number
                .parse::<i64>()
                .unwrap_or_default()
        )
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
