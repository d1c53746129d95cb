//! # Product Repository
//!
//! Catalog persistence plus stock adjustments.
//!
//! ## Stock Rules
//! ```text
//! stock = NULL  → stock tracking disabled, deductions are no-ops
//! stock = n     → deduct clamps at 0, never goes negative
//! ```
//! Deleting a product is a soft delete (is_active = 0) so historical
//! invoices keep a valid product_id to point at.

use billmitra_core::Product;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for product catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists all active products, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, hsn_code, base_price, gst_rate, unit, stock,
                   is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed active products");
        Ok(products)
    }

    /// Lists every product including soft-deleted ones.
    ///
    /// Used by backup export, which must capture the full catalog.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, hsn_code, base_price, gst_rate, unit, stock,
                   is_active, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Searches active products by name substring (case-insensitive).
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let pattern = format!("%{}%", query);

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, hsn_code, base_price, gst_rate, unit, stock,
                   is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1 AND name LIKE ?1
            ORDER BY name
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Fetches a single product by ID (active or not).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, hsn_code, base_price, gst_rate, unit, stock,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a new product and returns it with generated ID and timestamps.
    pub async fn insert(&self, mut product: Product) -> DbResult<Product> {
        if product.id.is_empty() {
            product.id = Uuid::new_v4().to_string();
        }
        let now = Utc::now();
        product.created_at = now;
        product.updated_at = now;

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, hsn_code, base_price, gst_rate, unit, stock,
                 is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.hsn_code)
        .bind(product.base_price)
        .bind(product.gst_rate)
        .bind(&product.unit)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Inserts a product verbatim, preserving ID and timestamps.
    ///
    /// Used by backup import; everyday creation goes through `insert`.
    pub async fn restore(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, hsn_code, base_price, gst_rate, unit, stock,
                 is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.hsn_code)
        .bind(product.base_price)
        .bind(product.gst_rate)
        .bind(&product.unit)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Deletes every product row. Backup import only.
    pub async fn delete_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM products").execute(&self.pool).await?;
        Ok(())
    }

    /// Updates an existing product's editable fields.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, hsn_code = ?3, base_price = ?4, gst_rate = ?5,
                unit = ?6, stock = ?7, updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.hsn_code)
        .bind(product.base_price)
        .bind(product.gst_rate)
        .bind(&product.unit)
        .bind(product.stock)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        debug!(id = %product.id, "Product updated");
        Ok(())
    }

    /// Adjusts stock by a signed delta, clamping the result at zero.
    ///
    /// ## Rules
    /// - `delta < 0` deducts (invoice finalization)
    /// - `delta > 0` restores (invoice deletion)
    /// - Products with `stock = NULL` are untouched
    ///
    /// Returns the new stock level, or `None` if tracking is disabled.
    pub async fn adjust_stock(&self, id: &str, delta: f64) -> DbResult<Option<f64>> {
        let product = self.get_by_id(id).await?;

        let new_stock = match product.stock {
            None => None,
            Some(current) => Some((current + delta).max(0.0)),
        };

        if let Some(stock) = new_stock {
            sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(stock)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

            debug!(id = %id, delta = delta, new_stock = stock, "Stock adjusted");
        }

        Ok(new_stock)
    }

    /// Sets stock to an absolute value (or disables tracking with `None`).
    pub async fn set_stock(&self, id: &str, stock: Option<f64>) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(stock)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    /// Soft-deletes a product so existing invoices keep their reference.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(id = %id, "Product soft-deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_product(name: &str) -> Product {
        let mut p = Product::sample(name, 100.0, 18.0);
        p.stock = Some(50.0);
        p
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo.insert(sample_product("Detergent Bar")).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap();

        assert_eq!(fetched.name, "Detergent Bar");
        assert_eq!(fetched.base_price, 100.0);
        assert_eq!(fetched.gst_rate, 18.0);
        assert_eq!(fetched.stock, Some(50.0));
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let db = test_db().await;
        let result = db.products().get_by_id("nonexistent").await;

        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_search_matches_substring() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(sample_product("Detergent Bar")).await.unwrap();
        repo.insert(sample_product("Detergent Powder")).await.unwrap();
        repo.insert(sample_product("Dish Soap")).await.unwrap();

        let results = repo.search("detergent").await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_at_zero() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert(sample_product("Soap")).await.unwrap();

        // Deduct more than available
        let new_stock = repo.adjust_stock(&product.id, -80.0).await.unwrap();
        assert_eq!(new_stock, Some(0.0));
    }

    #[tokio::test]
    async fn test_adjust_stock_skips_untracked() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = sample_product("Service Charge");
        product.stock = None;
        let product = repo.insert(product).await.unwrap();

        let new_stock = repo.adjust_stock(&product.id, -5.0).await.unwrap();
        assert_eq!(new_stock, None);

        let fetched = repo.get_by_id(&product.id).await.unwrap();
        assert_eq!(fetched.stock, None);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert(sample_product("Old Item")).await.unwrap();
        repo.soft_delete(&product.id).await.unwrap();

        assert_eq!(repo.list_active().await.unwrap().len(), 0);

        // Still reachable by ID for historical invoices
        let fetched = repo.get_by_id(&product.id).await.unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn test_restore_stock_on_delta() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert(sample_product("Soap")).await.unwrap();
        repo.adjust_stock(&product.id, -10.0).await.unwrap();
        let restored = repo.adjust_stock(&product.id, 10.0).await.unwrap();

        assert_eq!(restored, Some(50.0));
    }
}
