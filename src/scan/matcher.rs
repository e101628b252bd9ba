use crate::error::{FreqError, Result};
use regex::bytes::{CaptureLocations, Regex, RegexBuilder};
use std::ops::Range;
use thiserror::Error;

/// Spans reported for one match, relative to the searched haystack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpans {
    /// Whole match
    pub full: Range<usize>,
    /// First capture group, if the pattern has one and it participated
    pub group: Option<Range<usize>>,
}

impl MatchSpans {
    pub fn new(full: Range<usize>) -> Self {
        Self { full, group: None }
    }

    pub fn with_group(mut self, group: Range<usize>) -> Self {
        self.group = Some(group);
        self
    }

    /// The span that becomes the frequency key: the capture group when it
    /// matched something, otherwise the whole match
    pub fn key_span(&self) -> Range<usize> {
        match &self.group {
            Some(group) if !group.is_empty() => group.clone(),
            _ => self.full.clone(),
        }
    }

    /// Whether every span lies inside a haystack of `len` bytes
    pub fn fits(&self, len: usize) -> bool {
        let inside = |r: &Range<usize>| r.start <= r.end && r.end <= len;
        inside(&self.full) && self.group.as_ref().map_or(true, inside)
    }
}

/// Failures a matching engine can report mid-scan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("matching engine ran out of resources")]
    OutOfResources,

    #[error("matching failed: {0}")]
    Failed(String),
}

/// A compiled pattern the scanner drives over a buffer
///
/// `find` returns the leftmost match in `haystack`, `Ok(None)` when there is
/// none.
pub trait Matcher {
    fn find(&mut self, haystack: &[u8]) -> std::result::Result<Option<MatchSpans>, MatchError>;

    /// Source text of the pattern
    fn pattern(&self) -> &str;
}

/// [`Matcher`] backed by `regex::bytes`
///
/// Compiled case-insensitively and byte-oriented (no Unicode classes), with
/// `.` matching newlines like a POSIX extended expression.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
    locations: CaptureLocations,
    pattern: String,
}

impl RegexMatcher {
    /// Compile `pattern`
    ///
    /// # Errors
    /// `InvalidPattern` for any compile failure, including a program over
    /// the engine's size limit.
    pub fn compile(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .unicode(false)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| compile_error(pattern, e))?;

        let locations = regex.capture_locations();
        Ok(Self {
            regex,
            locations,
            pattern: pattern.to_string(),
        })
    }

    /// Number of capture groups, not counting the implicit whole match
    pub fn group_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }
}

fn compile_error(pattern: &str, err: regex::Error) -> FreqError {
    FreqError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    }
}

impl Matcher for RegexMatcher {
    fn find(&mut self, haystack: &[u8]) -> std::result::Result<Option<MatchSpans>, MatchError> {
        let Some(found) = self.regex.captures_read(&mut self.locations, haystack) else {
            return Ok(None);
        };

        let group = self.locations.get(1).map(|(start, end)| start..end);
        Ok(Some(MatchSpans {
            full: found.start()..found.end(),
            group,
        }))
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}
