//! SQLite-backed pair store.
//!
//! The storage key is unusual and load-bearing: a row is keyed by the id of
//! the comment it *replies to* (`parent_id` is the primary key), so each
//! conversational slot holds at most one winning reply. The row's own
//! `comment_id` carries a separate best-effort UNIQUE constraint.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// One reply addressed at the slot it replies to. `parent` is the resolved
/// text of the parent comment, absent when the parent was not in the store
/// at insertion time (it is never backfilled later).
#[derive(Debug, Clone)]
pub struct PairRow {
    pub parent_id: String,
    pub comment_id: String,
    pub parent: Option<String>,
    pub comment: String,
    pub subreddit: String,
    pub unix: i64,
    pub score: i64,
}

/// A pending write. `Insert` covers both the with-parent and no-parent
/// cases (the row's `parent` field decides); `Replace` overwrites every
/// non-key field of the row already holding the slot.
#[derive(Debug, Clone)]
pub enum Mutation {
    Insert(PairRow),
    Replace(PairRow),
}

/// The fields of the current slot winner that the pairing decision needs.
#[derive(Debug, Clone)]
pub struct SlotRow {
    pub parent: Option<String>,
    pub comment: String,
    pub score: i64,
}

/// One exportable row: parent/reply text plus the time cursor value.
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub parent: String,
    pub comment: String,
    pub unix: i64,
}

pub struct PairStore {
    conn: Connection,
}

impl PairStore {
    /// Open (or create) the store at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("open pair store {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store, useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory pair store")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS parent_reply(
                     parent_id TEXT PRIMARY KEY, comment_id TEXT UNIQUE, parent TEXT,
                     comment TEXT, subreddit TEXT, unix INT, score INT)",
                [],
            )
            .context("create parent_reply table")?;
        Ok(())
    }

    /// The row currently holding the slot keyed by `parent_id`, if any.
    pub fn slot(&self, parent_id: &str) -> Result<Option<SlotRow>> {
        self.conn
            .query_row(
                "SELECT parent, comment, score FROM parent_reply WHERE parent_id = ?1",
                params![parent_id],
                |r| {
                    Ok(SlotRow {
                        parent: r.get(0)?,
                        comment: r.get(1)?,
                        score: r.get(2)?,
                    })
                },
            )
            .optional()
            .with_context(|| format!("slot lookup for {parent_id}"))
    }

    /// Text of the already-ingested comment whose own id is `id` — the
    /// would-be parent of a new reply. A miss is a valid state, not an
    /// error: the parent was filtered out, or simply has not arrived.
    pub fn parent_text(&self, id: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT comment FROM parent_reply WHERE comment_id = ?1 LIMIT 1",
                params![id],
                |r| r.get(0),
            )
            .optional()
            .with_context(|| format!("parent text lookup for {id}"))
    }

    /// Committed row count (progress reporting only).
    pub fn row_count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT count(*) FROM parent_reply", [], |r| r.get(0))
            .context("count parent_reply rows")?;
        Ok(n as u64)
    }

    /// Apply a batch of mutations inside a single transaction. A statement
    /// that fails (primary-key or UNIQUE violation from a losing candidate)
    /// is dropped without aborting the batch or the job; the transaction
    /// still commits. Returns the number of statements that survived.
    pub fn apply_batch(&mut self, batch: &[Mutation]) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction().context("begin batch transaction")?;
        let mut applied = 0usize;
        for m in batch {
            let res = match m {
                Mutation::Insert(row) => tx.execute(
                    "INSERT INTO parent_reply(parent_id, comment_id, parent, comment, subreddit, unix, score)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        row.parent_id,
                        row.comment_id,
                        row.parent,
                        row.comment,
                        row.subreddit,
                        row.unix,
                        row.score
                    ],
                ),
                Mutation::Replace(row) => tx.execute(
                    "UPDATE parent_reply
                     SET comment_id = ?2, parent = ?3, comment = ?4,
                         subreddit = ?5, unix = ?6, score = ?7
                     WHERE parent_id = ?1",
                    params![
                        row.parent_id,
                        row.comment_id,
                        row.parent,
                        row.comment,
                        row.subreddit,
                        row.unix,
                        row.score
                    ],
                ),
            };
            match res {
                Ok(_) => applied += 1,
                Err(e) => tracing::trace!(error = %e, "statement dropped inside batch"),
            }
        }
        tx.commit().context("commit batch transaction")?;
        Ok(applied)
    }

    /// One export window: rows strictly after `after_unix` that resolved a
    /// parent and kept a positive score, oldest first, at most `limit`.
    pub fn fetch_page(&self, after_unix: i64, limit: usize) -> Result<Vec<ExportRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT parent, comment, unix FROM parent_reply
                 WHERE unix > ?1 AND parent NOT NULL AND score > 0
                 ORDER BY unix ASC LIMIT ?2",
            )
            .context("prepare export page query")?;
        let rows = stmt
            .query_map(params![after_unix, limit as i64], |r| {
                Ok(ExportRow {
                    parent: r.get(0)?,
                    comment: r.get(1)?,
                    unix: r.get(2)?,
                })
            })
            .context("run export page query")?;
        let mut page = Vec::with_capacity(limit.min(4096));
        for row in rows {
            page.push(row.context("read export row")?);
        }
        Ok(page)
    }
}
