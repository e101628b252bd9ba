//! JSON output format for frequency tables

use crate::freq_map::Pair;
use crate::runner::{CorpusRun, FileOutcome};
use crate::text_output::limit;
use serde::Serialize;

/// Totals for the whole run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonSummary {
    /// Distinct keys in the table
    pub keys: usize,
    /// Sum of all weights
    pub total_weight: f64,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    /// Pattern source or `words:N`
    pub job: String,
    pub summary: JsonSummary,
    pub files: &'a [FileOutcome],
    /// Heaviest first, ties by key
    pub pairs: &'a [Pair],
}

impl<'a> JsonOutput<'a> {
    /// `pairs` are expected to be ranked already; `top` (0 = all) cuts them
    pub fn new(job: String, run: &'a CorpusRun, pairs: &'a [Pair], top: usize) -> Self {
        let files_skipped = run.skipped();
        Self {
            version: env!("CARGO_PKG_VERSION"),
            job,
            summary: JsonSummary {
                keys: run.map.len(),
                total_weight: run.map.total_weight(),
                files_scanned: run.files.len() - files_skipped,
                files_skipped,
            },
            files: &run.files,
            pairs: limit(pairs, top),
        }
    }

    /// Serialize to pretty JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
