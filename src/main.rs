use anyhow::{Context, Result};
use clap::Parser;
use freqscan::cli::{Cli, OutputFormat};
use freqscan::corpus::CorpusConfig;
use freqscan::csv_output::CsvOutput;
use freqscan::json_output::JsonOutput;
use freqscan::runner::{self, RunOptions};
use freqscan::text_output::{Escape, TextOutput};
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber: warnings by default, everything with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_corpus(cli: &Cli) -> Result<CorpusConfig> {
    let corpus = if let Some(path) = &cli.corpus {
        CorpusConfig::from_toml(path)?
    } else if cli.default_corpus {
        CorpusConfig::default_corpus()?
    } else {
        CorpusConfig::from_paths(&cli.files)
    };

    let corpus = if cli.no_programming {
        corpus.without_programming()
    } else {
        corpus
    };
    corpus.validate()?;
    Ok(corpus)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let corpus = load_corpus(&cli)?;
    let job = cli.job();
    let run = runner::run_corpus(&corpus, &job, RunOptions { jobs: cli.jobs })
        .context("Frequency scan failed")?;

    if run.skipped() == run.files.len() {
        anyhow::bail!("None of the {} corpus files could be scanned", run.files.len());
    }

    let pairs = run.map.export_ranked();
    let rendered = match cli.format {
        OutputFormat::Text => TextOutput {
            top: cli.top,
            precision: cli.precision.unwrap_or(2),
            escape: if cli.raw { Escape::Raw } else { Escape::All },
            keys_only: cli.keys_only,
        }
        .render(&pairs),
        OutputFormat::Json => JsonOutput::new(cli.job_label(), &run, &pairs, cli.top).to_json()?,
        OutputFormat::Csv => CsvOutput::new(cli.top, cli.precision).render(&pairs),
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write output")?;
    Ok(())
}
