mod batch;
mod config;
mod engine;
mod export;
mod filters;
mod progress;
mod record;
mod source;
mod store;
mod util;

pub use crate::config::{normalize_sub, PairOptions};
pub use crate::engine::{IngestStats, PairingEngine};
pub use crate::export::{CorpusExporter, ExportStats};
pub use crate::store::{ExportRow, Mutation, PairRow, PairStore, SlotRow};

pub use crate::batch::BatchWriter;
pub use crate::filters::is_acceptable;
pub use crate::record::{normalize_body, parse_candidate, Candidate, RawComment};

// Expose line streaming so binaries can feed custom inputs through it.
pub use crate::source::for_each_line;

// Expose tracing init and the denylist env/file merge for application code.
pub use crate::util::{init_tracing_once, merge_extra_denied};
