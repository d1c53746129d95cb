//! # Invoice Counter Repository
//!
//! Persistence for per-prefix invoice number counters.
//!
//! ## Semantics
//! Each row stores the LAST COMMITTED number for a prefix. Reading never
//! advances the counter; the engine advances it with `set()` only after
//! the invoice artifact was produced (reserve-then-commit).

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;

/// Repository for invoice counter state.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Returns the last committed number for a prefix, 0 when never used.
    pub async fn get(&self, prefix: &str) -> DbResult<i64> {
        let row = sqlx::query("SELECT last_number FROM invoice_counters WHERE prefix = ?1")
            .bind(prefix)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<i64, _>("last_number")).unwrap_or(0))
    }

    /// Sets the counter for a prefix to an absolute value (upsert).
    pub async fn set(&self, prefix: &str, last_number: i64) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invoice_counters (prefix, last_number, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(prefix) DO UPDATE SET
                last_number = excluded.last_number,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(prefix)
        .bind(last_number)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(prefix = %prefix, last_number = last_number, "Counter set");
        Ok(())
    }

    /// Removes the counter row for a prefix. Missing rows are not an error:
    /// a removed counter and a never-used one are indistinguishable (both
    /// read back as 0).
    pub async fn delete(&self, prefix: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM invoice_counters WHERE prefix = ?1")
            .bind(prefix)
            .execute(&self.pool)
            .await?;

        info!(prefix = %prefix, "Counter removed");
        Ok(())
    }

    /// Returns all counters as (prefix, last_number) pairs, ordered by prefix.
    pub async fn all(&self) -> DbResult<Vec<(String, i64)>> {
        let rows = sqlx::query(
            "SELECT prefix, last_number FROM invoice_counters ORDER BY prefix",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get("prefix"), r.get("last_number")))
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
