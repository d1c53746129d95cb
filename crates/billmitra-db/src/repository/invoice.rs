//! # Invoice Repository
//!
//! Persistence for finalized invoices and their line items.
//!
//! ## Transactional Write
//! ```text
//! insert(invoice)
//!   BEGIN
//!     INSERT INTO invoices ...          ← header + totals
//!     INSERT INTO invoice_items ... ×N  ← one row per line, product snapshot
//!   COMMIT
//! ```
//! Either the whole invoice lands or none of it does. The UNIQUE index on
//! full_invoice_number makes double-commits of the same number impossible.

use billmitra_core::{DiscountType, Invoice, InvoiceItem, Product};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for invoice persistence.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

// =============================================================================
// Row Types
// =============================================================================

/// Invoice header row, private to this module.
#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    invoice_number: String,
    invoice_prefix: String,
    full_invoice_number: String,
    date: DateTime<Utc>,
    outlet_name: String,
    outlet_address: String,
    customer_gst_no: Option<String>,
    state: String,
    state_code: String,
    discount_type: DiscountType,
    discount_value: f64,
    subtotal: f64,
    discount_amount: f64,
    subtotal_after_discount: f64,
    total_cgst: f64,
    total_sgst: f64,
    total_tax: f64,
    total_before_round_off: f64,
    round_off: f64,
    grand_total: f64,
    amount_in_words: String,
    created_at: DateTime<Utc>,
}

/// Line item row carrying the frozen product snapshot.
#[derive(Debug, FromRow)]
struct InvoiceItemRow {
    id: String,
    product_id: String,
    product_name: String,
    product_hsn_code: String,
    product_base_price: f64,
    product_gst_rate: f64,
    product_unit: String,
    actual_quantity: f64,
    billed_quantity: f64,
    unit_price: f64,
    taxable_amount: f64,
    cgst_amount: f64,
    sgst_amount: f64,
    total_amount: f64,
    rot_percent: f64,
}

impl InvoiceItemRow {
    /// Rebuilds the core line item from the snapshot columns.
    ///
    /// The snapshot doesn't store stock or activity flags; the rebuilt
    /// product exists only to display the invoice, never to edit the catalog.
    fn into_item(self, snapshot_time: DateTime<Utc>) -> InvoiceItem {
        let product = Product {
            id: self.product_id,
            name: self.product_name,
            hsn_code: self.product_hsn_code,
            base_price: self.product_base_price,
            gst_rate: self.product_gst_rate,
            unit: self.product_unit,
            stock: None,
            is_active: true,
            created_at: snapshot_time,
            updated_at: snapshot_time,
        };

        InvoiceItem {
            id: self.id,
            product,
            actual_quantity: self.actual_quantity,
            billed_quantity: self.billed_quantity,
            unit_price: self.unit_price,
            taxable_amount: self.taxable_amount,
            cgst_amount: self.cgst_amount,
            sgst_amount: self.sgst_amount,
            total_amount: self.total_amount,
            rot_percent: self.rot_percent,
        }
    }
}

impl InvoiceRow {
    fn into_invoice(self, items: Vec<InvoiceItem>) -> Invoice {
        Invoice {
            id: self.id,
            invoice_number: self.invoice_number,
            invoice_prefix: self.invoice_prefix,
            full_invoice_number: self.full_invoice_number,
            date: self.date,
            outlet_name: self.outlet_name,
            outlet_address: self.outlet_address,
            customer_gst_no: self.customer_gst_no,
            state: self.state,
            state_code: self.state_code,
            items,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            subtotal: self.subtotal,
            discount_amount: self.discount_amount,
            subtotal_after_discount: self.subtotal_after_discount,
            total_cgst: self.total_cgst,
            total_sgst: self.total_sgst,
            total_tax: self.total_tax,
            total_before_round_off: self.total_before_round_off,
            round_off: self.round_off,
            grand_total: self.grand_total,
            amount_in_words: self.amount_in_words,
        }
    }
}

const INVOICE_COLUMNS: &str = "id, invoice_number, invoice_prefix, full_invoice_number, \
     date, outlet_name, outlet_address, customer_gst_no, state, state_code, \
     discount_type, discount_value, subtotal, discount_amount, \
     subtotal_after_discount, total_cgst, total_sgst, total_tax, \
     total_before_round_off, round_off, grand_total, amount_in_words, created_at";

// =============================================================================
// Repository
// =============================================================================

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Persists a finalized invoice with all its line items in one transaction.
    pub async fn insert(&self, invoice: &Invoice) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            r#"
            INSERT INTO invoices ({INVOICE_COLUMNS})
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                    ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)
            "#
        ))
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.invoice_prefix)
        .bind(&invoice.full_invoice_number)
        .bind(invoice.date)
        .bind(&invoice.outlet_name)
        .bind(&invoice.outlet_address)
        .bind(&invoice.customer_gst_no)
        .bind(&invoice.state)
        .bind(&invoice.state_code)
        .bind(invoice.discount_type)
        .bind(invoice.discount_value)
        .bind(invoice.subtotal)
        .bind(invoice.discount_amount)
        .bind(invoice.subtotal_after_discount)
        .bind(invoice.total_cgst)
        .bind(invoice.total_sgst)
        .bind(invoice.total_tax)
        .bind(invoice.total_before_round_off)
        .bind(invoice.round_off)
        .bind(invoice.grand_total)
        .bind(&invoice.amount_in_words)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for item in &invoice.items {
            let item_id = if item.id.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                item.id.clone()
            };

            sqlx::query(
                r#"
                INSERT INTO invoice_items
                    (id, invoice_id, product_id, product_name, product_hsn_code,
                     product_base_price, product_gst_rate, product_unit,
                     actual_quantity, billed_quantity, unit_price,
                     taxable_amount, cgst_amount, sgst_amount, total_amount,
                     rot_percent)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                        ?13, ?14, ?15, ?16)
                "#,
            )
            .bind(&item_id)
            .bind(&invoice.id)
            .bind(&item.product.id)
            .bind(&item.product.name)
            .bind(&item.product.hsn_code)
            .bind(item.product.base_price)
            .bind(item.product.gst_rate)
            .bind(&item.product.unit)
            .bind(item.actual_quantity)
            .bind(item.billed_quantity)
            .bind(item.unit_price)
            .bind(item.taxable_amount)
            .bind(item.cgst_amount)
            .bind(item.sgst_amount)
            .bind(item.total_amount)
            .bind(item.rot_percent)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %invoice.id,
            number = %invoice.full_invoice_number,
            items = invoice.items.len(),
            grand_total = invoice.grand_total,
            "Invoice persisted"
        );
        Ok(())
    }

    /// Fetches an invoice with all its line items.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Invoice> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Invoice", id))?;

        let items = self.fetch_items(id, row.created_at).await?;
        Ok(row.into_invoice(items))
    }

    /// Fetches an invoice by its printed number ("KTC-42").
    pub async fn get_by_full_number(&self, full_number: &str) -> DbResult<Invoice> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE full_invoice_number = ?1"
        ))
        .bind(full_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Invoice", full_number))?;

        let items = self.fetch_items(&row.id.clone(), row.created_at).await?;
        Ok(row.into_invoice(items))
    }

    /// Lists the most recent invoices (headers with items), newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut invoices = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.fetch_items(&row.id.clone(), row.created_at).await?;
            invoices.push(row.into_invoice(items));
        }

        debug!(count = invoices.len(), "Listed recent invoices");
        Ok(invoices)
    }

    /// Deletes an invoice and returns it so the caller can restore stock.
    ///
    /// Line items go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: &str) -> DbResult<Invoice> {
        let invoice = self.get_with_items(id).await?;

        sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(id = %id, number = %invoice.full_invoice_number, "Invoice deleted");
        Ok(invoice)
    }

    /// Counts stored invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn fetch_items(
        &self,
        invoice_id: &str,
        snapshot_time: DateTime<Utc>,
    ) -> DbResult<Vec<InvoiceItem>> {
        let rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, product_id, product_name, product_hsn_code,
                   product_base_price, product_gst_rate, product_unit,
                   actual_quantity, billed_quantity, unit_price,
                   taxable_amount, cgst_amount, sgst_amount, total_amount,
                   rot_percent
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| r.into_item(snapshot_time))
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use billmitra_core::calculate::compute_invoice_totals;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_invoice(number: i64) -> Invoice {
        let product = Product::sample("Detergent Bar", 100.0, 18.0);
        let item = InvoiceItem::compute(Uuid::new_v4().to_string(), product, 2.0, 2.0, 100.0);
        let items = vec![item];
        let totals = compute_invoice_totals(&items, DiscountType::None, 0.0, false);

        let mut invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number: number.to_string(),
            invoice_prefix: "KTC".to_string(),
            full_invoice_number: format!("KTC-{}", number),
            date: Utc::now(),
            outlet_name: "Corner Store".to_string(),
            outlet_address: "MG Road, Kochi".to_string(),
            customer_gst_no: Some("32AAACK1234F1Z5".to_string()),
            state: "Kerala".to_string(),
            state_code: "32".to_string(),
            items,
            discount_type: DiscountType::None,
            discount_value: 0.0,
            subtotal: 0.0,
            discount_amount: 0.0,
            subtotal_after_discount: 0.0,
            total_cgst: 0.0,
            total_sgst: 0.0,
            total_tax: 0.0,
            total_before_round_off: 0.0,
            round_off: 0.0,
            grand_total: 0.0,
            amount_in_words: "Two Hundred Thirty Six Rupees Only".to_string(),
        };
        invoice.apply_totals(&totals);
        invoice
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = sample_invoice(1);
        repo.insert(&invoice).await.unwrap();

        let fetched = repo.get_with_items(&invoice.id).await.unwrap();
        assert_eq!(fetched.full_invoice_number, "KTC-1");
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].taxable_amount, 200.0);
        assert_eq!(fetched.grand_total, 236.0);
        assert_eq!(fetched.discount_type, DiscountType::None);
    }

    #[tokio::test]
    async fn test_duplicate_full_number_rejected() {
        let db = test_db().await;
        let repo = db.invoices();

        let first = sample_invoice(7);
        let mut second = sample_invoice(7);
        second.id = Uuid::new_v4().to_string();

        repo.insert(&first).await.unwrap();
        let result = repo.insert(&second).await;

        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_full_number() {
        let db = test_db().await;
        let repo = db.invoices();

        repo.insert(&sample_invoice(42)).await.unwrap();

        let fetched = repo.get_by_full_number("KTC-42").await.unwrap();
        assert_eq!(fetched.invoice_number, "42");
    }

    #[tokio::test]
    async fn test_delete_cascades_items() {
        let db = test_db().await;
        let repo = db.invoices();

        let invoice = sample_invoice(3);
        repo.insert(&invoice).await.unwrap();

        let deleted = repo.delete(&invoice.id).await.unwrap();
        assert_eq!(deleted.items.len(), 1);

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_list_recent_respects_limit() {
        let db = test_db().await;
        let repo = db.invoices();

        for n in 1..=5 {
            repo.insert(&sample_invoice(n)).await.unwrap();
        }

        let recent = repo.list_recent(3).await.unwrap();
        assert_eq!(recent.len(), 3);
    }
}
