//! Corpus runner: scan every file of a corpus into one frequency table
//!
//! Each file is scanned into its own [`FrequencyMap`]; the per-file maps are
//! merged in corpus order, so a parallel run produces the same table as a
//! sequential one.

use crate::corpus::{CorpusConfig, CorpusFile};
use crate::error::{FreqError, Result};
use crate::freq_map::FrequencyMap;
use crate::scan::{self, RegexMatcher, ScanReport, WindowReport};
use crossbeam::channel;
use crossbeam::queue::ArrayQueue;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// What to count in each file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Every match of a regular expression
    Pattern { pattern: String },
    /// Sliding windows of `word_count` words
    Windows { word_count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Worker threads; 1 scans sequentially
    pub jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// How a single file went
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    Scanned(ScanReport),
    Windows(WindowReport),
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub weight: f64,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, FileStatus::Skipped { .. })
    }
}

/// Merged table plus one outcome per corpus file, in corpus order
#[derive(Debug)]
pub struct CorpusRun {
    pub map: FrequencyMap,
    pub files: Vec<FileOutcome>,
}

impl CorpusRun {
    pub fn skipped(&self) -> usize {
        self.files.iter().filter(|f| f.is_skipped()).count()
    }
}

type FileResult = Result<(FrequencyMap, FileStatus)>;

/// A job with its pattern compiled, ready to hand to workers
#[derive(Debug, Clone)]
enum Task {
    Pattern(RegexMatcher),
    Windows(usize),
}

impl Task {
    fn prepare(job: &Job) -> Result<Self> {
        match job {
            Job::Pattern { pattern } => Ok(Task::Pattern(RegexMatcher::compile(pattern)?)),
            Job::Windows { word_count: 0 } => Err(FreqError::InvalidWordCount(0)),
            Job::Windows { word_count } => Ok(Task::Windows(*word_count)),
        }
    }

    fn run(&mut self, file: &CorpusFile) -> FileResult {
        let mut map = FrequencyMap::new()?;
        let status = match self {
            Task::Pattern(matcher) => FileStatus::Scanned(scan::scan_file_with(
                &mut map,
                &file.path,
                matcher,
                file.weight,
            )?),
            Task::Windows(word_count) => FileStatus::Windows(scan::extract_windows(
                &mut map,
                &file.path,
                *word_count,
                file.weight,
            )?),
        };
        Ok((map, status))
    }
}

/// Run `job` over every file in `corpus`
///
/// # Errors
/// An invalid pattern or zero word count fails before any file is read.
/// Unreadable files and files the regex engine gives up on are skipped
/// with a warning and reported as [`FileStatus::Skipped`]; any other error
/// aborts the run.
pub fn run_corpus(corpus: &CorpusConfig, job: &Job, options: RunOptions) -> Result<CorpusRun> {
    let task = Task::prepare(job)?;
    let files = corpus.resolved_files();
    let jobs = options.jobs.clamp(1, files.len().max(1));

    tracing::debug!(files = files.len(), jobs, ?job, "starting corpus run");
    let results = if jobs == 1 {
        run_sequential(task, &files)
    } else {
        run_parallel(&task, &files, jobs)
    };

    collect(files, results)
}

fn run_sequential(mut task: Task, files: &[CorpusFile]) -> Vec<Option<FileResult>> {
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let result = task.run(file);
        let fatal = matches!(&result, Err(e) if !e.is_per_file());
        results.push(Some(result));
        if fatal {
            break;
        }
    }
    results
}

fn run_parallel(task: &Task, files: &[CorpusFile], jobs: usize) -> Vec<Option<FileResult>> {
    let queue = ArrayQueue::new(files.len());
    for index in 0..files.len() {
        // Capacity matches the file count
        let _ = queue.push(index);
    }
    let abort = AtomicBool::new(false);
    let (sender, receiver) = channel::unbounded::<(usize, FileResult)>();

    let scoped = crossbeam::scope(|s| {
        for _ in 0..jobs {
            let mut task = task.clone();
            let sender = sender.clone();
            let (queue, abort) = (&queue, &abort);
            s.spawn(move |_| {
                while let Some(index) = queue.pop() {
                    if abort.load(Ordering::Relaxed) {
                        break;
                    }
                    let result = task.run(&files[index]);
                    if matches!(&result, Err(e) if !e.is_per_file()) {
                        abort.store(true, Ordering::Relaxed);
                    }
                    if sender.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(sender);
    if let Err(panic) = scoped {
        std::panic::resume_unwind(panic);
    }

    let mut results: Vec<Option<FileResult>> = (0..files.len()).map(|_| None).collect();
    for (index, result) in receiver {
        results[index] = Some(result);
    }
    results
}

fn collect(files: Vec<CorpusFile>, results: Vec<Option<FileResult>>) -> Result<CorpusRun> {
    let mut map = FrequencyMap::new()?;
    let mut outcomes = Vec::with_capacity(files.len());

    for (file, result) in files.into_iter().zip(results) {
        // Unfinished files only occur once a fatal error is pending
        let Some(result) = result else { continue };

        let status = match result {
            Ok((file_map, status)) => {
                map.merge(&file_map)?;
                tracing::info!(
                    file = %file.path.display(),
                    weight = file.weight,
                    keys = file_map.len(),
                    "done with file"
                );
                status
            }
            Err(err) if err.is_per_file() => {
                tracing::warn!(file = %file.path.display(), error = %err, "skipping file");
                FileStatus::Skipped {
                    reason: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        };

        outcomes.push(FileOutcome {
            path: file.path,
            weight: file.weight,
            status,
        });
    }

    tracing::debug!(keys = map.len(), total = map.total_weight(), "corpus run finished");
    Ok(CorpusRun {
        map,
        files: outcomes,
    })
}
