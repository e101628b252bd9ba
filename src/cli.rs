//! CLI argument parsing for freqscan

use crate::preset::Preset;
use crate::runner::Job;
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for frequency tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `KEY WEIGHT` lines (default)
    Text,
    /// JSON report with per-file outcomes
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "freqscan")]
#[command(version)]
#[command(about = "Weighted character, n-gram and word frequencies over a text corpus", long_about = None)]
#[command(group(ArgGroup::new("job").required(true).args(["pattern", "preset", "words"])))]
#[command(group(ArgGroup::new("input").required(true).args(["files", "corpus", "default_corpus"])))]
pub struct Cli {
    /// Text files to scan, as PATH or PATH:WEIGHT (weight defaults to 1)
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Corpus description in TOML
    #[arg(long, value_name = "TOML")]
    pub corpus: Option<PathBuf>,

    /// Use the built-in corpus under ./000bigfiles
    #[arg(long)]
    pub default_corpus: bool,

    /// Leave out files categorized as programming source
    #[arg(long)]
    pub no_programming: bool,

    /// Count matches of a regular expression (group 1 if present)
    #[arg(short, long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Count matches of a built-in pattern
    #[arg(long, value_enum, value_name = "NAME")]
    pub preset: Option<Preset>,

    /// Count sliding windows of N words
    #[arg(short, long, value_name = "N")]
    pub words: Option<usize>,

    /// Print only the N heaviest entries (0 = all)
    #[arg(short = 'n', long, value_name = "N", default_value_t = 0)]
    pub top: usize,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Digits after the decimal point (text defaults to 2)
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Leave tabs and backslashes unescaped in text output
    #[arg(long)]
    pub raw: bool,

    /// Print only the keys, space separated
    #[arg(long)]
    pub keys_only: bool,

    /// Worker threads
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Enable debug tracing output (to stderr)
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// The counting job selected by `--pattern`, `--preset` or `--words`
    pub fn job(&self) -> Job {
        if let Some(word_count) = self.words {
            Job::Windows { word_count }
        } else if let Some(preset) = self.preset {
            Job::Pattern {
                pattern: preset.pattern().to_string(),
            }
        } else {
            Job::Pattern {
                pattern: self.pattern.clone().unwrap_or_default(),
            }
        }
    }

    /// Label for the job in reports
    pub fn job_label(&self) -> String {
        match self.job() {
            Job::Pattern { pattern } => pattern,
            Job::Windows { word_count } => format!("words:{word_count}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_files_and_pattern() {
        let cli = Cli::parse_from(["freqscan", "-p", "[a-z]", "a.txt:3", "b.txt"]);
        assert_eq!(cli.files, vec!["a.txt:3", "b.txt"]);
        assert_eq!(
            cli.job(),
            Job::Pattern {
                pattern: "[a-z]".to_string()
            }
        );
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.jobs, 1);
        assert_eq!(cli.top, 0);
    }

    #[test]
    fn test_cli_preset() {
        let cli = Cli::parse_from(["freqscan", "--preset", "first-letter", "a.txt"]);
        assert_eq!(cli.preset, Some(Preset::FirstLetter));
        assert_eq!(
            cli.job(),
            Job::Pattern {
                pattern: Preset::FirstLetter.pattern().to_string()
            }
        );
    }

    #[test]
    fn test_cli_words() {
        let cli = Cli::parse_from(["freqscan", "--words", "2", "--default-corpus"]);
        assert_eq!(cli.job(), Job::Windows { word_count: 2 });
        assert_eq!(cli.job_label(), "words:2");
        assert!(cli.default_corpus);
    }

    #[test]
    fn test_cli_requires_job() {
        assert!(Cli::try_parse_from(["freqscan", "a.txt"]).is_err());
    }

    #[test]
    fn test_cli_rejects_two_jobs() {
        let result =
            Cli::try_parse_from(["freqscan", "-p", "[a-z]", "--preset", "letters", "a.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["freqscan", "-p", "[a-z]"]).is_err());
    }

    #[test]
    fn test_cli_rejects_two_inputs() {
        let result =
            Cli::try_parse_from(["freqscan", "-p", "x", "--corpus", "c.toml", "--default-corpus"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_output_flags() {
        let cli = Cli::parse_from([
            "freqscan",
            "--preset",
            "digraphs",
            "--corpus",
            "c.toml",
            "--no-programming",
            "--format",
            "csv",
            "--top",
            "10",
            "--precision",
            "4",
            "--raw",
            "--jobs",
            "4",
            "--debug",
        ]);
        assert_eq!(cli.corpus, Some(PathBuf::from("c.toml")));
        assert!(cli.no_programming);
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.top, 10);
        assert_eq!(cli.precision, Some(4));
        assert!(cli.raw);
        assert_eq!(cli.jobs, 4);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_unknown_preset() {
        assert!(Cli::try_parse_from(["freqscan", "--preset", "nope", "a.txt"]).is_err());
    }
}
