//! Per-author tag counter storage.
//!
//! # Responsibility
//! - Apply signed count deltas for one author as a single atomic step.
//! - Return raw counters; filtering and ordering belong to the ledger.
//!
//! # Invariants
//! - Missing `(author, tag)` rows are created on first delta (upsert).
//! - Counters are never clamped. Zero and negative values are stored as-is.

use crate::repo::{ensure_tables, RepoResult};
use rusqlite::{params, Connection};

/// One signed change to a tag counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDelta {
    pub tag: String,
    pub delta: i64,
}

impl TagDelta {
    pub fn new(tag: impl Into<String>, delta: i64) -> Self {
        Self {
            tag: tag.into(),
            delta,
        }
    }
}

/// Repository interface for per-author tag accounts.
pub trait TagAccountRepository {
    /// Applies all deltas for `author` atomically (all or none).
    fn apply_deltas(&self, author: &str, deltas: &[TagDelta]) -> RepoResult<()>;
    /// Returns every stored counter for `author`, in unspecified order.
    fn list_counts(&self, author: &str) -> RepoResult<Vec<(String, i64)>>;
    /// Drops the whole account of `author`; returns how many counters went.
    fn clear_author(&self, author: &str) -> RepoResult<u64>;
}

/// SQLite-backed tag account repository.
#[derive(Clone, Copy)]
pub struct SqliteTagAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagAccountRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["tag_counts"])?;
        Ok(Self { conn })
    }
}

impl TagAccountRepository for SqliteTagAccountRepository<'_> {
    fn apply_deltas(&self, author: &str, deltas: &[TagDelta]) -> RepoResult<()> {
        if deltas.is_empty() {
            return Ok(());
        }

        // The whole account is one logical document, so one transaction.
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tag_counts (author, tag, count)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (author, tag)
                 DO UPDATE SET count = count + excluded.count;",
            )?;
            for delta in deltas {
                stmt.execute(params![author, delta.tag.as_str(), delta.delta])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn list_counts(&self, author: &str) -> RepoResult<Vec<(String, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag, count FROM tag_counts WHERE author = ?1;")?;
        let mut rows = stmt.query([author])?;
        let mut counts = Vec::new();
        while let Some(row) = rows.next()? {
            counts.push((row.get("tag")?, row.get("count")?));
        }
        Ok(counts)
    }

    fn clear_author(&self, author: &str) -> RepoResult<u64> {
        let removed = self
            .conn
            .execute("DELETE FROM tag_counts WHERE author = ?1;", [author])?;
        Ok(removed as u64)
    }
}
