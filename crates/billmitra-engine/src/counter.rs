//! # Invoice Number Counter
//!
//! Sequential, per-prefix invoice numbering with a reserve-then-commit
//! protocol.
//!
//! ## Why Reserve-Then-Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  next("KTC")   ──▶  reads last=41, offers 42     (NO mutation)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  render invoice artifact                                                │
//! │       │                                                                 │
//! │       ├── failure ──▶ nothing stored; next("KTC") offers 42 again      │
//! │       │                                                                 │
//! │       └── success ──▶ commit("KTC") stores last=42                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A crash or render failure between reserve and commit never burns a
//! number; gaps in the legal invoice sequence are what auditors ask about.
//!
//! ## Concurrency
//! All store access goes through one `tokio::sync::Mutex`, so two tasks
//! can never interleave a reserve/commit pair against the same process.
//! Two DEVICES sharing a database can still race; resolving that needs a
//! sync layer and is out of scope here.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use billmitra_core::invoice_number::format_invoice_number;
use billmitra_db::CounterRepository;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Counter Store
// =============================================================================

/// Backing storage for counter state.
///
/// The counter logic is identical whatever the storage; this seam exists
/// so tests run against a HashMap and the app against SQLite.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Returns the last committed number for a prefix, `None` if never used.
    async fn get(&self, prefix: &str) -> EngineResult<Option<i64>>;

    /// Stores an absolute value for a prefix (last write wins).
    async fn set(&self, prefix: &str, value: i64) -> EngineResult<()>;

    /// Removes a prefix entirely. Missing prefixes are not an error.
    async fn delete(&self, prefix: &str) -> EngineResult<()>;

    /// Returns every (prefix, last_number) pair, ordered by prefix.
    async fn all(&self) -> EngineResult<Vec<(String, i64)>>;
}

/// In-memory store for tests and previews.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<BTreeMap<String, i64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get(&self, prefix: &str) -> EngineResult<Option<i64>> {
        Ok(self.counters.lock().await.get(prefix).copied())
    }

    async fn set(&self, prefix: &str, value: i64) -> EngineResult<()> {
        self.counters.lock().await.insert(prefix.to_string(), value);
        Ok(())
    }

    async fn delete(&self, prefix: &str) -> EngineResult<()> {
        self.counters.lock().await.remove(prefix);
        Ok(())
    }

    async fn all(&self) -> EngineResult<Vec<(String, i64)>> {
        Ok(self
            .counters
            .lock()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect())
    }
}

/// SQLite-backed store wrapping the db counter repository.
#[derive(Debug, Clone)]
pub struct SqliteCounterStore {
    repo: CounterRepository,
}

impl SqliteCounterStore {
    pub fn new(repo: CounterRepository) -> Self {
        SqliteCounterStore { repo }
    }
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    async fn get(&self, prefix: &str) -> EngineResult<Option<i64>> {
        // The repo collapses "never used" to 0; keep that mapping here too.
        let value = self.repo.get(prefix).await?;
        Ok(if value == 0 { None } else { Some(value) })
    }

    async fn set(&self, prefix: &str, value: i64) -> EngineResult<()> {
        self.repo.set(prefix, value).await.map_err(EngineError::from)
    }

    async fn delete(&self, prefix: &str) -> EngineResult<()> {
        self.repo.delete(prefix).await.map_err(EngineError::from)
    }

    async fn all(&self) -> EngineResult<Vec<(String, i64)>> {
        self.repo.all().await.map_err(EngineError::from)
    }
}

// =============================================================================
// Reserved Number
// =============================================================================

/// A number offered by `next()` but not yet committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNumber {
    pub prefix: String,
    /// The bare sequence number (last committed + 1).
    pub number: i64,
    /// The printed form, `"{prefix}-{number}"`.
    pub full_number: String,
}

// =============================================================================
// Invoice Counter
// =============================================================================

/// Per-prefix sequential invoice numbering.
///
/// ## Example
/// ```rust,ignore
/// let counter = InvoiceCounter::new(InMemoryCounterStore::new());
///
/// let reserved = counter.next("KTC").await?;   // KTC-1, nothing stored
/// let again = counter.next("KTC").await?;      // still KTC-1
/// counter.commit("KTC").await?;                // stored: last = 1
/// let after = counter.next("KTC").await?;      // KTC-2
/// ```
pub struct InvoiceCounter<S: CounterStore> {
    store: Mutex<S>,
}

impl<S: CounterStore> InvoiceCounter<S> {
    pub fn new(store: S) -> Self {
        InvoiceCounter {
            store: Mutex::new(store),
        }
    }

    /// Offers the next number for a prefix WITHOUT advancing the counter.
    ///
    /// Idempotent: calling twice without an intervening `commit` offers
    /// the same number both times.
    pub async fn next(&self, prefix: &str) -> EngineResult<ReservedNumber> {
        let store = self.store.lock().await;
        let last = store.get(prefix).await?.unwrap_or(0);
        let number = last + 1;

        debug!(prefix = %prefix, number = number, "Reserved invoice number");
        Ok(ReservedNumber {
            prefix: prefix.to_string(),
            number,
            full_number: format_invoice_number(prefix, number),
        })
    }

    /// Advances the counter by one, confirming the last reserved number.
    ///
    /// Returns the number that is now committed.
    pub async fn commit(&self, prefix: &str) -> EngineResult<i64> {
        let store = self.store.lock().await;
        let last = store.get(prefix).await?.unwrap_or(0);
        let committed = last + 1;
        store.set(prefix, committed).await?;

        info!(prefix = %prefix, number = committed, "Committed invoice number");
        Ok(committed)
    }

    /// Returns the last committed number for a prefix (0 if never used).
    pub async fn current(&self, prefix: &str) -> EngineResult<i64> {
        let store = self.store.lock().await;
        Ok(store.get(prefix).await?.unwrap_or(0))
    }

    /// Sets the counter to an absolute value (admin operation).
    ///
    /// The next invoice after `set(prefix, 100)` is number 101.
    pub async fn set(&self, prefix: &str, last_number: i64) -> EngineResult<()> {
        let store = self.store.lock().await;
        store.set(prefix, last_number).await
    }

    /// Resets the counter to `start_from`; the next invoice is
    /// `start_from + 1`. `reset(prefix, 0)` starts the sequence over at 1.
    pub async fn reset(&self, prefix: &str, start_from: i64) -> EngineResult<()> {
        let store = self.store.lock().await;
        store.set(prefix, start_from).await
    }

    /// Removes the counter for a prefix; the next use starts at 1 again.
    pub async fn remove(&self, prefix: &str) -> EngineResult<()> {
        let store = self.store.lock().await;
        store.delete(prefix).await
    }

    /// Returns every known prefix with its last committed number.
    pub async fn all(&self) -> EngineResult<Vec<(String, i64)>> {
        let store = self.store.lock().await;
        store.all().await
    }
}

/// Shared handle used by the finalize flow.
pub type SharedCounter<S> = Arc<InvoiceCounter<S>>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> InvoiceCounter<InMemoryCounterStore> {
        InvoiceCounter::new(InMemoryCounterStore::new())
    }

    #[tokio::test]
    async fn test_first_number_is_one() {
        let c = counter();
        let reserved = c.next("KTC").await.unwrap();

        assert_eq!(reserved.number, 1);
        assert_eq!(reserved.full_number, "KTC-1");
    }

    #[tokio::test]
    async fn test_reserve_is_idempotent() {
        let c = counter();

        let first = c.next("KTC").await.unwrap();
        let second = c.next("KTC").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(c.current("KTC").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_advances() {
        let c = counter();

        c.next("KTC").await.unwrap();
        let committed = c.commit("KTC").await.unwrap();
        assert_eq!(committed, 1);

        let next = c.next("KTC").await.unwrap();
        assert_eq!(next.number, 2);
    }

    #[tokio::test]
    async fn test_sequence_after_many_commits() {
        let c = counter();

        for expected in 1..=5 {
            let reserved = c.next("INV").await.unwrap();
            assert_eq!(reserved.number, expected);
            c.commit("INV").await.unwrap();
        }

        assert_eq!(c.current("INV").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_prefixes_are_independent() {
        let c = counter();

        c.commit("A").await.unwrap();
        c.commit("A").await.unwrap();
        c.commit("B").await.unwrap();

        assert_eq!(c.current("A").await.unwrap(), 2);
        assert_eq!(c.current("B").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_jumps_sequence() {
        let c = counter();

        c.set("KTC", 100).await.unwrap();
        let reserved = c.next("KTC").await.unwrap();

        assert_eq!(reserved.number, 101);
        assert_eq!(reserved.full_number, "KTC-101");
    }

    #[tokio::test]
    async fn test_reset_continues_from_given_number() {
        let c = counter();

        c.set("KTC", 500).await.unwrap();
        c.reset("KTC", 100).await.unwrap();

        assert_eq!(c.current("KTC").await.unwrap(), 100);
        assert_eq!(c.next("KTC").await.unwrap().number, 101);
    }

    #[tokio::test]
    async fn test_reset_to_zero_restarts_at_one() {
        let c = counter();

        c.set("KTC", 500).await.unwrap();
        c.reset("KTC", 0).await.unwrap();

        let reserved = c.next("KTC").await.unwrap();
        assert_eq!(reserved.number, 1);
        assert_eq!(reserved.full_number, "KTC-1");
    }

    #[tokio::test]
    async fn test_remove_forgets_prefix() {
        let c = counter();

        c.set("OLD", 42).await.unwrap();
        c.remove("OLD").await.unwrap();

        assert_eq!(c.current("OLD").await.unwrap(), 0);
        assert_eq!(c.next("OLD").await.unwrap().number, 1);
    }

    #[tokio::test]
    async fn test_all_lists_prefixes() {
        let c = counter();

        c.set("A", 1).await.unwrap();
        c.set("B", 2).await.unwrap();

        let all = c.all().await.unwrap();
        assert_eq!(all, vec![("A".to_string(), 1), ("B".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_concurrent_commits_never_lose_numbers() {
        let c = Arc::new(counter());

        let mut handles = Vec::new();
        for _ in 0..10 {
            let c = Arc::clone(&c);
            handles.push(tokio::spawn(async move {
                c.commit("KTC").await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(c.current("KTC").await.unwrap(), 10);
    }
}
