//! The pairing engine: one synchronous pass over a flat comment stream,
//! deciding per accepted record whether it replaces the current winner of a
//! conversational slot, pairs with an already-stored parent, or opens a new
//! slot with the parent text left absent.
//!
//! Parent resolution is deliberately greedy and single-pass: a reply picks
//! up its parent's text only if the parent is already in the store when the
//! reply is processed. A child arriving before its parent keeps an absent
//! parent field forever — arrival order shapes the output, and downstream
//! corpus consumers depend on that exact behavior.

use crate::batch::BatchWriter;
use crate::config::PairOptions;
use crate::filters::is_acceptable;
use crate::progress::make_progress_bar_labeled;
use crate::record::parse_candidate;
use crate::source::for_each_line;
use crate::store::{Mutation, PairStore};
use crate::util::init_tracing_once;
use anyhow::Result;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Counters returned by an ingest run.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestStats {
    pub read: u64,     // raw lines seen (including malformed/rejected)
    pub accepted: u64, // records that passed the acceptance filter
    pub paired: u64,   // records inserted with resolved parent text
    pub applied: u64,  // statements that survived batch commits
}

pub struct PairingEngine {
    opts: PairOptions,
}

impl PairingEngine {
    pub fn new(opts: PairOptions) -> Self {
        Self { opts }
    }

    /// Ingest a monthly dump file (plain JSONL or `.zst`) into the store.
    pub fn ingest_file(&self, input: &Path, store: &mut PairStore) -> Result<IngestStats> {
        init_tracing_once();

        let total_bytes = fs::metadata(input).map(|m| m.len()).unwrap_or(0);
        let pb = if self.opts.progress {
            Some(make_progress_bar_labeled(total_bytes, self.opts.progress_label.as_deref()))
        } else {
            None
        };

        let mut stats = IngestStats::default();
        let mut batch = BatchWriter::new(self.opts.batch_threshold);

        for_each_line(
            input,
            self.opts.read_buffer_bytes,
            |delta| {
                if let Some(pb) = &pb {
                    pb.inc(delta);
                }
            },
            |line| self.step(line, store, &mut batch, &mut stats),
        )?;
        stats.applied += batch.flush(store)? as u64;

        if let Some(pb) = pb {
            let final_msg = if let Some(l) = self.opts.progress_label.as_deref() {
                format!("{l} done")
            } else {
                "done".to_string()
            };
            pb.finish_with_message(final_msg);
        }
        tracing::info!(
            read = stats.read,
            paired = stats.paired,
            stored = store.row_count()?,
            "pairing pass complete"
        );
        Ok(stats)
    }

    /// Ingest from any line source. Used by tests and by callers that do
    /// their own input plumbing.
    pub fn ingest_lines<R: BufRead>(&self, reader: R, store: &mut PairStore) -> Result<IngestStats> {
        init_tracing_once();
        let mut stats = IngestStats::default();
        let mut batch = BatchWriter::new(self.opts.batch_threshold);
        for line in reader.lines() {
            let line = line?;
            self.step(&line, store, &mut batch, &mut stats)?;
        }
        stats.applied += batch.flush(store)? as u64;
        Ok(stats)
    }

    /// Process one raw line: parse (skip malformed), filter, decide, queue.
    fn step(
        &self,
        line: &str,
        store: &mut PairStore,
        batch: &mut BatchWriter,
        stats: &mut IngestStats,
    ) -> Result<()> {
        stats.read += 1;
        if stats.read % self.opts.progress_every == 0 {
            tracing::info!(
                read = stats.read,
                paired = stats.paired,
                stored = store.row_count()?,
                "pairing progress"
            );
        }

        let cand = match parse_candidate(line) {
            Some(c) => c,
            None => return Ok(()),
        };
        if !is_acceptable(&cand.body, &cand.subreddit, cand.score, &self.opts) {
            return Ok(());
        }
        stats.accepted += 1;

        // Lookups see committed rows only; writes still buffered in the
        // current batch are invisible to later records in the same batch.
        let slot = store.slot(&cand.parent_id)?;
        let mutation = match slot {
            Some(existing) if cand.score > existing.score => {
                // Replace-in-place: same key, all fields overwritten. The
                // slot keeps its already-resolved parent text — replacement
                // never re-resolves the grandparent, and never backfills.
                Mutation::Replace(cand.into_row(existing.parent))
            }
            _ => match store.parent_text(&cand.parent_id)? {
                Some(parent) => {
                    // If the slot is occupied by a higher-or-equal score,
                    // the primary-key violation is swallowed at commit and
                    // the earlier winner stays.
                    stats.paired += 1;
                    Mutation::Insert(cand.into_row(Some(parent)))
                }
                None => Mutation::Insert(cand.into_row(None)),
            },
        };
        stats.applied += batch.push(store, mutation)? as u64;
        Ok(())
    }
}
