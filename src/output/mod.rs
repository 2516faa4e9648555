//! Output layer: the corpus row sink and run statistics

mod corpus;
mod stats;

pub use corpus::{CorpusFile, RowSink, SinkError, SinkResult};
pub use stats::RunStats;
