use serde_json::json;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One synthetic comment record in monthly-dump shape. `parent` is the raw
/// reference including its kind prefix (e.g. "t1_abc" or "t3_s1").
pub fn comment(id: &str, parent: &str, body: &str, sub: &str, unix: i64, score: i64) -> String {
    json!({
        "id": id, "parent_id": parent, "body": body, "subreddit": sub,
        "created_utc": unix, "score": score, "author": "someone",
        "controversiality": 0, "gilded": 0, "link_id": "t3_s1"
    })
    .to_string()
}

/// Join records into one in-memory JSONL stream for `ingest_lines`.
pub fn jsonl(lines: &[String]) -> String {
    let mut s = lines.join("\n");
    s.push('\n');
    s
}

/// Write a plain-text JSONL dump file.
pub fn write_plain_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a compressed `.zst` dump file with the same content shape.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Read a line-oriented file into strings, keeping every line (the corpus
/// files must stay index-aligned, so nothing is filtered here).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).collect()
}
