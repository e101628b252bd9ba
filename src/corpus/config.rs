use super::definition::{Category, CorpusFile};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct CorpusFileToml {
    root: Option<PathBuf>,
    #[serde(default)]
    file: Vec<CorpusFile>,
}

/// A weighted list of corpus files
///
/// # Example Usage
/// ```no_run
/// use freqscan::corpus::CorpusConfig;
///
/// let corpus = CorpusConfig::from_toml("corpus.toml")?.without_programming();
/// corpus.validate()?;
/// for file in corpus.resolved_files() {
///     println!("{} x{}", file.path.display(), file.weight);
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusConfig {
    /// Directory relative file paths are joined onto
    pub root: Option<PathBuf>,
    pub files: Vec<CorpusFile>,
}

impl CorpusConfig {
    /// Load a corpus description from a TOML file
    ///
    /// A relative `root` is resolved against the directory holding the TOML
    /// file; without `root`, file paths are relative to that directory.
    ///
    /// # Example TOML
    /// ```toml
    /// root = "texts"
    ///
    /// [[file]]
    /// path = "prose.txt"
    /// weight = 18.0
    /// category = "prose"
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
        let parsed: CorpusFileToml = toml::from_str(&content)
            .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let root = match parsed.root {
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        };

        Ok(Self {
            root: Some(root),
            files: parsed.file,
        })
    }

    /// The built-in corpus, one file per genre under `000bigfiles/`
    ///
    /// Uses the embedded corpus-default.toml; the root stays relative to the
    /// working directory.
    pub fn default_corpus() -> Result<Self> {
        const DEFAULT_TOML: &str = include_str!("../../corpus-default.toml");

        let parsed: CorpusFileToml =
            toml::from_str(DEFAULT_TOML).context("Failed to parse embedded corpus-default.toml")?;
        Ok(Self {
            root: parsed.root,
            files: parsed.file,
        })
    }

    /// Corpus from `PATH[:WEIGHT]` command-line arguments
    pub fn from_paths<S: AsRef<str>>(specs: &[S]) -> Self {
        Self {
            root: None,
            files: specs
                .iter()
                .map(|spec| CorpusFile::from_spec(spec.as_ref()))
                .collect(),
        }
    }

    /// Drop files categorized as programming source
    pub fn without_programming(mut self) -> Self {
        self.files.retain(|f| f.category != Category::Programming);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            anyhow::bail!("Corpus has no files");
        }
        for file in &self.files {
            if !file.weight.is_finite() || file.weight < 0.0 {
                anyhow::bail!(
                    "Invalid weight {} for corpus file {}",
                    file.weight,
                    file.path.display()
                );
            }
        }
        Ok(())
    }

    /// Files with their paths joined onto `root`
    pub fn resolved_files(&self) -> Vec<CorpusFile> {
        self.files
            .iter()
            .map(|file| CorpusFile {
                path: self.resolve(&file.path),
                ..file.clone()
            })
            .collect()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Sum of all file weights
    pub fn total_weight(&self) -> f64 {
        self.files.iter().map(|f| f.weight).sum()
    }
}
