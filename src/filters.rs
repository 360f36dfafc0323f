//! Acceptance filter: a pure function of (score, subreddit, body).

use crate::config::PairOptions;

/// A record enters the store only when every check holds. Rejections are
/// silent; the pairing pass simply moves on to the next record.
pub fn is_acceptable(body: &str, subreddit: &str, score: i64, opts: &PairOptions) -> bool {
    if score < opts.min_score {
        return false;
    }
    if opts.is_denied(subreddit) {
        return false;
    }
    acceptable_body(body, opts)
}

/// Body-only heuristics: word cap, length bounds, and the pseudo-content
/// placeholders left behind by deletions.
pub fn acceptable_body(body: &str, opts: &PairOptions) -> bool {
    if body.split_whitespace().count() > opts.max_word_count {
        return false;
    }
    // Length bounds are in characters, not bytes: multibyte bodies must not
    // be cut short by their UTF-8 encoding.
    let chars = body.chars().count();
    if chars < opts.min_len || chars > opts.max_len {
        return false;
    }
    if body == "[deleted]" || body == "[removed]" {
        return false;
    }
    true
}
