use super::matcher::{MatchError, Matcher, RegexMatcher};
use crate::error::{FreqError, Result};
use crate::freq_map::FrequencyMap;
use crate::loader;
use serde::Serialize;
use std::path::Path;

/// Longest sequence a pattern is expected to match
pub const MAX_SEQUENCE_LEN: usize = 1000;

/// Bytes the engine sees per match attempt
pub const SCAN_WINDOW: usize = 2 * MAX_SEQUENCE_LEN;

/// Where the next search starts after a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overlap {
    /// One past the start of the previous match (letters, digraphs, ...)
    Overlapping,
    /// At the end of the previous match (words and other variable-length runs)
    Disjoint,
}

impl Overlap {
    /// Variable-length patterns (containing `+` or `*`) never overlap
    ///
    /// # Example
    /// ```
    /// use freqscan::scan::Overlap;
    ///
    /// assert_eq!(Overlap::from_pattern("[a-z]{2,2}"), Overlap::Overlapping);
    /// assert_eq!(Overlap::from_pattern("[a-z]+"), Overlap::Disjoint);
    /// ```
    pub fn from_pattern(pattern: &str) -> Self {
        if pattern.contains(|c| c == '+' || c == '*') {
            Overlap::Disjoint
        } else {
            Overlap::Overlapping
        }
    }
}

/// What a single pass over the buffer does with each match
pub enum ScanMode<'a> {
    /// Count matches only
    Count,
    /// Increment `map[key]` by `weight` for every legal key
    Accumulate {
        map: &'a mut FrequencyMap,
        weight: f64,
    },
}

/// Counters from one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub matches: u64,
    pub inserted: u64,
    pub rejected: u64,
    /// Matches that ran into the edge of a truncated window
    pub truncated: u64,
}

/// Result of scanning one buffer or file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub matches: u64,
    pub inserted: u64,
    pub rejected: u64,
    pub truncated: u64,
    pub weight_per_match: f64,
}

/// Printable ASCII, newline and tab only
pub fn is_legal_sequence(sequence: &[u8]) -> bool {
    sequence
        .iter()
        .all(|&b| b == b' ' || b.is_ascii_graphic() || b == b'\n' || b == b'\t')
}

fn legal_key(sequence: &[u8]) -> Option<&str> {
    if is_legal_sequence(sequence) {
        std::str::from_utf8(sequence).ok()
    } else {
        None
    }
}

/// One pass of `matcher` over `buffer`
///
/// Each attempt is limited to [`SCAN_WINDOW`] bytes from the current
/// position. When a truncated window holds no match, the scan resumes
/// [`MAX_SEQUENCE_LEN`] bytes before the window's end, so any match no
/// longer than that is still found. A match starting in the last
/// [`MAX_SEQUENCE_LEN`] bytes of a truncated window, or running into its
/// edge, is retried from its own start, so every accepted match had at
/// least [`MAX_SEQUENCE_LEN`] bytes of room. Only sequences longer than the
/// whole window are cut off, silently, and counted in
/// [`PassStats::truncated`].
pub fn scan_pass<M: Matcher + ?Sized>(
    buffer: &[u8],
    matcher: &mut M,
    overlap: Overlap,
    mut mode: ScanMode<'_>,
) -> Result<PassStats> {
    let mut stats = PassStats::default();
    let mut pos = 0;

    while pos < buffer.len() {
        let window_end = buffer.len().min(pos.saturating_add(SCAN_WINDOW));
        let window = &buffer[pos..window_end];
        let cut_short = window_end < buffer.len();

        let spans = match matcher.find(window) {
            Ok(Some(spans)) if spans.fits(window.len()) => spans,
            Ok(Some(spans)) => {
                tracing::debug!(?spans, window = window.len(), "match outside window, stopping");
                break;
            }
            Ok(None) if cut_short => {
                pos = window_end - MAX_SEQUENCE_LEN;
                continue;
            }
            Ok(None) => break,
            Err(MatchError::OutOfResources) => {
                return Err(FreqError::EngineOutOfResources {
                    pattern: matcher.pattern().to_string(),
                })
            }
            Err(MatchError::Failed(reason)) => {
                tracing::debug!(%reason, offset = pos, "matching stopped");
                break;
            }
        };

        if spans.full.is_empty() {
            pos += spans.full.start + 1;
            continue;
        }

        let at_edge = cut_short && spans.full.end == window.len();
        // A match starting in the last MAX_SEQUENCE_LEN bytes of a cut-short
        // window may have backtracked away from the edge
        let near_edge = cut_short && spans.full.start > window.len() - MAX_SEQUENCE_LEN;
        if (at_edge || near_edge) && spans.full.start > 0 {
            // Retry with the window anchored at this match
            pos += spans.full.start;
            continue;
        }

        stats.matches += 1;
        if at_edge {
            stats.truncated += 1;
            tracing::debug!(offset = pos + spans.full.start, "match reached the scan window edge");
        }

        if let ScanMode::Accumulate { map, weight } = &mut mode {
            match legal_key(&window[spans.key_span()]) {
                Some(key) => {
                    map.increment(key, *weight)?;
                    stats.inserted += 1;
                }
                None => stats.rejected += 1,
            }
        }

        pos += match overlap {
            Overlap::Overlapping => spans.full.start + 1,
            Overlap::Disjoint => spans.full.end,
        };
    }

    Ok(stats)
}

/// Run `fill` against a fresh scratch map and merge the scratch into `map`
/// only if `fill` succeeds
pub(super) fn merge_on_success<T, F>(map: &mut FrequencyMap, fill: F) -> Result<T>
where
    F: FnOnce(&mut FrequencyMap) -> Result<T>,
{
    let mut scratch = FrequencyMap::new()?;
    let value = fill(&mut scratch)?;
    map.merge(&scratch)?;
    Ok(value)
}

/// Scan an already case-folded buffer into `map`
///
/// Counts matches first, then re-scans adding `multiplier / matches` per
/// match, so the buffer contributes `multiplier` in total no matter how
/// long it is. The second pass fills a scratch map that is merged into
/// `map` only once the whole buffer has been scanned.
pub fn scan_buffer<M: Matcher + ?Sized>(
    map: &mut FrequencyMap,
    buffer: &[u8],
    matcher: &mut M,
    overlap: Overlap,
    multiplier: f64,
) -> Result<ScanReport> {
    let counted = scan_pass(buffer, matcher, overlap, ScanMode::Count)?;
    if counted.matches == 0 {
        return Ok(ScanReport::default());
    }

    let weight = multiplier / counted.matches as f64;
    let pass = merge_on_success(map, |scratch| {
        scan_pass(
            buffer,
            matcher,
            overlap,
            ScanMode::Accumulate {
                map: scratch,
                weight,
            },
        )
    })?;

    Ok(ScanReport {
        matches: pass.matches,
        inserted: pass.inserted,
        rejected: pass.rejected,
        truncated: pass.truncated,
        weight_per_match: weight,
    })
}

/// Scan the file at `path` with an already compiled matcher
pub fn scan_file_with<M: Matcher + ?Sized>(
    map: &mut FrequencyMap,
    path: &Path,
    matcher: &mut M,
    multiplier: f64,
) -> Result<ScanReport> {
    let buffer = loader::load_folded(path)?;
    let overlap = Overlap::from_pattern(matcher.pattern());
    let report = scan_buffer(map, &buffer, matcher, overlap, multiplier)?;

    tracing::debug!(
        file = %path.display(),
        matches = report.matches,
        rejected = report.rejected,
        ?overlap,
        "scanned file"
    );
    Ok(report)
}

/// Count every match of `pattern` in the file at `path`, weighting the
/// file's total contribution to `multiplier`
///
/// # Errors
/// `InvalidPattern` if the pattern does not compile, `Read` if the file
/// cannot be read, `EngineOutOfResources` if matching gives up. On error
/// nothing from this file reaches `map`.
pub fn scan_file(
    map: &mut FrequencyMap,
    path: &Path,
    pattern: &str,
    multiplier: f64,
) -> Result<ScanReport> {
    let mut matcher = RegexMatcher::compile(pattern)?;
    scan_file_with(map, path, &mut matcher, multiplier)
}
