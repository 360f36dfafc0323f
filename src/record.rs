//! Raw record parsing and body normalization for monthly RC dumps.

use serde::Deserialize;

use crate::store::PairRow;

/// Minimal line-level schema for the pairing pass.
/// Extra fields are ignored by serde; every field is optional at parse
/// level so a single malformed record never aborts the stream.
#[derive(Debug, Deserialize)]
pub struct RawComment {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub body: Option<String>,
    pub subreddit: Option<String>,
    pub created_utc: Option<i64>,
    pub score: Option<i64>,
}

/// A fully-parsed, normalized candidate reply, ready for the acceptance
/// filter and the pairing decision.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub comment_id: String,
    pub parent_id: String, // bare id, "t1_"/"t3_" kind prefix stripped
    pub body: String,      // normalized (see `normalize_body`)
    pub subreddit: String,
    pub unix: i64,
    pub score: i64,
}

impl Candidate {
    /// Materialize a store row keyed by what this candidate replies to.
    pub fn into_row(self, parent: Option<String>) -> PairRow {
        PairRow {
            parent_id: self.parent_id,
            comment_id: self.comment_id,
            parent,
            comment: self.body,
            subreddit: self.subreddit,
            unix: self.unix,
            score: self.score,
        }
    }
}

/// Parse one JSONL line into a `Candidate`. Returns None for malformed
/// records: bad JSON, a missing field, or a parent reference without the
/// `kind_id` prefix. Callers skip such records and continue.
pub fn parse_candidate(line: &str) -> Option<Candidate> {
    let raw: RawComment = serde_json::from_str(line).ok()?;
    let comment_id = raw.id?;
    let parent_ref = raw.parent_id?;
    let (_, parent_id) = parent_ref.split_once('_')?;
    if parent_id.is_empty() {
        return None;
    }
    Some(Candidate {
        comment_id,
        parent_id: parent_id.to_string(),
        body: normalize_body(&raw.body?),
        subreddit: raw.subreddit?,
        unix: raw.created_utc?,
        score: raw.score?,
    })
}

/// Substitute characters that would break the line-oriented corpus files:
/// embedded newlines/carriage returns become a literal " new_line " token
/// and double quotes become single quotes. One stored row must map to
/// exactly one physical line in each export file.
pub fn normalize_body(body: &str) -> String {
    body.replace('\n', " new_line ")
        .replace('\r', " new_line ")
        .replace('"', "'")
}
