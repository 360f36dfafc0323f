//! Corpus exporter: re-reads the pair store oldest-first in fixed-size
//! windows and materializes aligned parent/reply line files. The first
//! window becomes the test split; every later window is appended to the
//! train split.

use crate::config::PairOptions;
use crate::store::PairStore;
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Counters returned by an export run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExportStats {
    pub test_rows: u64,
    pub train_rows: u64,
    pub pages: u64,
}

pub struct CorpusExporter {
    opts: PairOptions,
}

impl CorpusExporter {
    pub fn new(opts: PairOptions) -> Self {
        Self { opts }
    }

    /// Write `test_from`/`test_to` and `train_from`/`train_to` under
    /// `out_dir`. Line *i* of a `_from` file is the parent text and line *i*
    /// of its `_to` twin the reply text of the same row, in export order.
    /// All four files exist afterwards, empty ones included; a store smaller
    /// than one window ends up entirely in the test split.
    pub fn export(&self, store: &PairStore, out_dir: &Path) -> Result<ExportStats> {
        init_tracing_once();
        fs::create_dir_all(out_dir)
            .with_context(|| format!("create {}", out_dir.display()))?;

        let mut test = SplitFiles::create(out_dir, "test", self.opts.write_buffer_bytes)?;
        let mut train = SplitFiles::create(out_dir, "train", self.opts.write_buffer_bytes)?;

        let limit = self.opts.page_size.max(1);
        let mut last_time = i64::MIN;
        let mut stats = ExportStats::default();

        // Cursor pagination on `unix`; a terminating short (or empty) page
        // is still written before the loop stops.
        loop {
            let page = store.fetch_page(last_time, limit)?;
            if let Some(last) = page.last() {
                last_time = last.unix;
            }
            let target = if stats.pages == 0 { &mut test } else { &mut train };
            for row in &page {
                target.write_pair(&row.parent, &row.comment)?;
            }
            if stats.pages == 0 {
                stats.test_rows = page.len() as u64;
            } else {
                stats.train_rows += page.len() as u64;
            }
            stats.pages += 1;
            if stats.pages % 20 == 0 {
                tracing::info!(
                    pages = stats.pages,
                    rows = stats.test_rows + stats.train_rows,
                    "export progress"
                );
            }
            if page.len() < limit {
                break;
            }
        }

        test.finish()?;
        train.finish()?;
        tracing::info!(
            test_rows = stats.test_rows,
            train_rows = stats.train_rows,
            pages = stats.pages,
            "export complete"
        );
        Ok(stats)
    }
}

/// One `_from`/`_to` pair of line-oriented UTF-8 files.
struct SplitFiles {
    from: BufWriter<File>,
    to: BufWriter<File>,
}

impl SplitFiles {
    fn create(dir: &Path, split: &str, buf_bytes: usize) -> Result<Self> {
        let cap = buf_bytes.max(8 * 1024);
        let from_path = dir.join(format!("{split}_from"));
        let to_path = dir.join(format!("{split}_to"));
        let from = File::create(&from_path)
            .with_context(|| format!("create {}", from_path.display()))?;
        let to = File::create(&to_path)
            .with_context(|| format!("create {}", to_path.display()))?;
        Ok(Self {
            from: BufWriter::with_capacity(cap, from),
            to: BufWriter::with_capacity(cap, to),
        })
    }

    #[inline]
    fn write_pair(&mut self, parent: &str, comment: &str) -> io::Result<()> {
        self.from.write_all(parent.as_bytes())?;
        self.from.write_all(b"\n")?;
        self.to.write_all(comment.as_bytes())?;
        self.to.write_all(b"\n")?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.from.flush().context("flush _from split")?;
        self.to.flush().context("flush _to split")?;
        Ok(())
    }
}
