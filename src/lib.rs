//! freqscan: weighted frequency tables over a text corpus
//!
//! Counts characters, n-grams, words, or anything else a regular expression
//! can match, across a set of weighted text files. Each file contributes its
//! weight in total regardless of size, so a small genre is not drowned out by
//! a large one. Word n-grams use sliding windows instead of a pattern.
//!
//! ```no_run
//! use freqscan::corpus::CorpusConfig;
//! use freqscan::runner::{run_corpus, Job, RunOptions};
//!
//! let corpus = CorpusConfig::from_paths(&["prose.txt:18", "news.txt:20"]);
//! let job = Job::Pattern { pattern: "[a-z]{2,2}".to_string() };
//! let run = run_corpus(&corpus, &job, RunOptions::default())?;
//! for pair in run.map.export_ranked().iter().take(10) {
//!     println!("{} {:.2}", pair.key, pair.weight);
//! }
//! # Ok::<(), freqscan::error::FreqError>(())
//! ```

pub mod cli;
pub mod corpus;
pub mod csv_output;
pub mod error;
pub mod freq_map;
pub mod json_output;
pub mod loader;
pub mod preset;
pub mod runner;
pub mod scan;
pub mod text_output;
