use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Genre of a corpus file
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Prose,
    Casual,
    Programming,
    Formal,
    News,
    #[default]
    Other,
}

/// One weighted corpus file
///
/// # Example TOML
/// ```toml
/// [[file]]
/// path = "04allNews.txt"
/// weight = 20.0
/// category = "news"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CorpusFile {
    /// File location, relative to the corpus root unless absolute
    pub path: PathBuf,

    /// Total weight this file contributes to a pattern scan, or the weight
    /// of each window for word n-grams
    pub weight: f64,

    #[serde(default)]
    pub category: Category,
}

impl CorpusFile {
    pub fn new(path: impl Into<PathBuf>, weight: f64) -> Self {
        Self {
            path: path.into(),
            weight,
            category: Category::Other,
        }
    }

    /// Parse a command-line argument, `PATH` or `PATH:WEIGHT`
    ///
    /// # Example
    /// ```
    /// use freqscan::corpus::CorpusFile;
    ///
    /// let file = CorpusFile::from_spec("news.txt:2.5");
    /// assert_eq!(file.path.to_str(), Some("news.txt"));
    /// assert_eq!(file.weight, 2.5);
    ///
    /// assert_eq!(CorpusFile::from_spec("plain.txt").weight, 1.0);
    /// ```
    pub fn from_spec(spec: &str) -> Self {
        if let Some((path, weight)) = spec.rsplit_once(':') {
            if let Ok(weight) = weight.parse::<f64>() {
                if !path.is_empty() {
                    return Self::new(path, weight);
                }
            }
        }
        Self::new(spec, 1.0)
    }
}
