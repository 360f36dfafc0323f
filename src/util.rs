use crate::config::normalize_sub;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Merge extra denied subreddits from env/file into the provided vector (in-place).
/// - PAIRETL_DENY_SUBREDDITS: comma/semicolon/space separated names
/// - PAIRETL_DENY_SUBREDDITS_FILE: path to newline-separated file of names
/// All entries are normalized (lowercase, no "r/"), then the list is sort+dedup.
pub fn merge_extra_denied(target: &mut Vec<String>) {
    use std::fs::File;
    use std::io::{BufRead, BufReader};

    if let Ok(s) = std::env::var("PAIRETL_DENY_SUBREDDITS") {
        for raw in s.split(|c: char| c == ',' || c == ';' || c.is_whitespace()) {
            let n = normalize_sub(raw);
            if !n.is_empty() {
                target.push(n);
            }
        }
    }

    if let Ok(path) = std::env::var("PAIRETL_DENY_SUBREDDITS_FILE") {
        if !path.trim().is_empty() {
            if let Ok(f) = File::open(&path) {
                let r = BufReader::new(f);
                for line in r.lines().flatten() {
                    let n = normalize_sub(&line);
                    if !n.is_empty() {
                        target.push(n);
                    }
                }
            } else {
                tracing::warn!("PAIRETL_DENY_SUBREDDITS_FILE is set but cannot be opened: {}", path);
            }
        }
    }

    // normalize + sort + dedup
    for s in target.iter_mut() {
        *s = normalize_sub(s);
    }
    target.sort();
    target.dedup();
}
