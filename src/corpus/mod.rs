// Weighted corpus description
//
// A corpus is a list of text files, each with a weight giving its share of
// the final frequency table. Loaded from TOML, from `PATH[:WEIGHT]` arguments,
// or from the embedded default (one concatenated file per genre).

mod config;
mod definition;

pub use config::CorpusConfig;
pub use definition::{Category, CorpusFile};
