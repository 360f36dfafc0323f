use anyhow::Result;
use pairetl::{merge_extra_denied, CorpusExporter, PairOptions, PairStore, PairingEngine};
use std::fs;
use std::path::PathBuf;

const DATA_ROOT: &str = "./data";
const MONTH: &str = "2018-08";

fn main() -> Result<()> {
    let data_dir = PathBuf::from(DATA_ROOT);
    let input = {
        let zst = data_dir.join(format!("RC_{MONTH}.zst"));
        if zst.exists() { zst } else { data_dir.join(format!("RC_{MONTH}")) }
    };
    let db_path = PathBuf::from(format!("{MONTH}.db"));
    let out_dir = data_dir.join("formatted");
    fs::create_dir_all(&out_dir)?;

    let mut denied = vec!["sweden".to_string(), "greece".to_string()];
    merge_extra_denied(&mut denied);

    let opts = PairOptions::default()
        .with_denied_subreddits(&denied)
        .with_progress_label(format!("Pairing RC_{MONTH}"));

    let mut store = PairStore::open(&db_path)?;
    let stats = PairingEngine::new(opts.clone()).ingest_file(&input, &mut store)?;
    println!(
        "Read {} rows, accepted {}, paired {}",
        stats.read, stats.accepted, stats.paired
    );

    let ex = CorpusExporter::new(opts).export(&store, &out_dir)?;
    println!(
        "Exported {} test rows and {} train rows over {} pages into {}",
        ex.test_rows,
        ex.train_rows,
        ex.pages,
        out_dir.display()
    );
    Ok(())
}
