//! # Outlet Repository
//!
//! Customer outlet persistence. Invoices carry a frozen snapshot of the
//! outlet at finalization time, so outlets can be hard-deleted without
//! breaking invoice history.

use billmitra_core::Outlet;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for customer outlet operations.
#[derive(Debug, Clone)]
pub struct OutletRepository {
    pool: SqlitePool,
}

impl OutletRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OutletRepository { pool }
    }

    /// Lists all outlets, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Outlet>> {
        let outlets = sqlx::query_as::<_, Outlet>(
            r#"
            SELECT id, name, address, gst_no, created_at, updated_at
            FROM outlets
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = outlets.len(), "Listed outlets");
        Ok(outlets)
    }

    /// Searches outlets by name substring (case-insensitive).
    pub async fn search(&self, query: &str) -> DbResult<Vec<Outlet>> {
        let pattern = format!("%{}%", query);

        let outlets = sqlx::query_as::<_, Outlet>(
            r#"
            SELECT id, name, address, gst_no, created_at, updated_at
            FROM outlets
            WHERE name LIKE ?1
            ORDER BY name
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(outlets)
    }

    /// Fetches a single outlet by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Outlet> {
        sqlx::query_as::<_, Outlet>(
            r#"
            SELECT id, name, address, gst_no, created_at, updated_at
            FROM outlets
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Outlet", id))
    }

    /// Inserts a new outlet and returns it with generated ID and timestamps.
    pub async fn insert(&self, mut outlet: Outlet) -> DbResult<Outlet> {
        if outlet.id.is_empty() {
            outlet.id = Uuid::new_v4().to_string();
        }
        let now = Utc::now();
        outlet.created_at = now;
        outlet.updated_at = now;

        sqlx::query(
            r#"
            INSERT INTO outlets (id, name, address, gst_no, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&outlet.id)
        .bind(&outlet.name)
        .bind(&outlet.address)
        .bind(&outlet.gst_no)
        .bind(outlet.created_at)
        .bind(outlet.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %outlet.id, name = %outlet.name, "Outlet created");
        Ok(outlet)
    }

    /// Inserts an outlet verbatim, preserving ID and timestamps.
    ///
    /// Used by backup import; everyday creation goes through `insert`.
    pub async fn restore(&self, outlet: &Outlet) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO outlets (id, name, address, gst_no, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&outlet.id)
        .bind(&outlet.name)
        .bind(&outlet.address)
        .bind(&outlet.gst_no)
        .bind(outlet.created_at)
        .bind(outlet.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Deletes every outlet row. Backup import only.
    pub async fn delete_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM outlets").execute(&self.pool).await?;
        Ok(())
    }

    /// Updates an outlet's editable fields.
    pub async fn update(&self, outlet: &Outlet) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE outlets
            SET name = ?2, address = ?3, gst_no = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&outlet.id)
        .bind(&outlet.name)
        .bind(&outlet.address)
        .bind(&outlet.gst_no)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Outlet", &outlet.id));
        }

        debug!(id = %outlet.id, "Outlet updated");
        Ok(())
    }

    /// Hard-deletes an outlet. Invoices keep their own snapshot.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM outlets WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Outlet", id));
        }

        info!(id = %id, "Outlet deleted");
        Ok(())
    }

    /// Counts outlets.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM outlets")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
