//! Input line streaming: one monthly dump file, plain JSONL or
//! zstd-compressed (`.zst`), fed line-by-line to a callback with
//! byte-accurate progress on the compressed stream.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

/// A `Read` wrapper that counts bytes pulled from the underlying file, so
/// progress tracks the on-disk size even through a decompressor.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}
impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Stream `path` line-by-line; `on_progress(delta)` reports file bytes
/// consumed, `on_line` receives each line with its `\r?\n` stripped.
///
/// `.zst` inputs are decoded with `window_log_max(31)` up front to avoid
/// "Frame requires too much memory" on very large frames. Decode errors are
/// fatal here: this engine ingests a single input, so there is no next file
/// to skip to.
pub fn for_each_line(
    path: &Path,
    read_buf_bytes: usize,
    mut on_progress: impl FnMut(u64),
    mut on_line: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let counter = Arc::new(AtomicU64::new(0));
    let counting = CountingReader { inner: file, counter: counter.clone() };

    let cap = read_buf_bytes.max(8 * 1024);
    let is_zst = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("zst"));

    let mut reader: Box<dyn BufRead> = if is_zst {
        let mut decoder =
            Decoder::new(counting).with_context(|| format!("zstd decode {}", path.display()))?;
        decoder.window_log_max(31)?;
        Box::new(BufReader::with_capacity(cap, decoder))
    } else {
        Box::new(BufReader::with_capacity(cap, counting))
    };

    let mut buf = String::with_capacity(16 * 1024);
    let mut last = 0u64;
    loop {
        buf.clear();
        let n = reader
            .read_line(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            // final progress flush
            let cur = counter.load(Ordering::Relaxed);
            if cur > last {
                on_progress(cur - last);
            }
            break;
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        let cur = counter.load(Ordering::Relaxed);
        if cur > last {
            on_progress(cur - last);
            last = cur;
        }
        on_line(&buf)?;
    }
    Ok(())
}
