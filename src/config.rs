/// User-facing options with sensible defaults and builder chaining.
/// One structure is passed explicitly into both batch jobs (pairing and
/// export) so nothing about acceptance, batching, or pagination is
/// hard-coded.
#[derive(Clone, Debug)]
pub struct PairOptions {
    // Acceptance filter
    pub min_score: i64,               // reject below this score
    pub max_word_count: usize,        // whitespace-split word cap
    pub min_len: usize,               // body length bounds (chars)
    pub max_len: usize,
    pub denied_subreddits: Vec<String>, // normalized lowercase, sorted for binary_search

    // Store / export shape
    pub batch_threshold: usize,       // pending writes per transaction
    pub page_size: usize,             // rows per export window

    // Progress & logging
    pub progress: bool,               // show progress bar
    pub progress_label: Option<String>, // optional label for progress bar
    pub progress_every: u64,          // periodic count log interval (records read)

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity
}

impl Default for PairOptions {
    fn default() -> Self {
        // Defaults match the corpus-building heuristics the store was tuned
        // for; all of them are runtime-adjustable via the builder methods.
        let default_read = 256 * 1024;
        let default_write = 256 * 1024;

        Self {
            min_score: 2,
            max_word_count: 50,
            min_len: 1,
            max_len: 1000,
            denied_subreddits: Vec::new(),

            batch_threshold: 1000,
            page_size: 5000,

            progress: true,
            progress_label: None,
            progress_every: 10_000,

            read_buffer_bytes: default_read,
            write_buffer_bytes: default_write,
        }
    }
}

impl PairOptions {
    pub fn with_min_score(mut self, v: i64) -> Self {
        self.min_score = v;
        self
    }
    pub fn with_max_word_count(mut self, v: usize) -> Self {
        self.max_word_count = v;
        self
    }
    pub fn with_len_bounds(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len.max(min_len);
        self
    }
    pub fn with_denied_subreddits<I, S>(mut self, subs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut v: Vec<String> = subs.into_iter().map(|s| normalize_sub(s.as_ref())).collect();
        v.sort();
        v.dedup();
        self.denied_subreddits = v;
        self
    }
    pub fn with_batch_threshold(mut self, n: usize) -> Self {
        self.batch_threshold = n.max(1);
        self
    }
    pub fn with_page_size(mut self, n: usize) -> Self {
        self.page_size = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_progress_every(mut self, every: u64) -> Self {
        self.progress_every = every.max(1);
        self
    }

    // IO buffers tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }

    /// Denylist check against a raw subreddit name (case-insensitive).
    pub fn is_denied(&self, subreddit: &str) -> bool {
        let s = normalize_sub(subreddit);
        self.denied_subreddits.binary_search(&s).is_ok()
    }
}

#[inline]
pub fn normalize_sub(s: &str) -> String {
    let s = s.trim().to_lowercase();
    if let Some(rest) = s.strip_prefix("r/") { rest.to_string() } else { s }
}
