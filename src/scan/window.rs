use super::pattern::merge_on_success;
use crate::error::{FreqError, Result};
use crate::freq_map::FrequencyMap;
use crate::loader;
use serde::Serialize;
use std::ops::Range;
use std::path::Path;

/// Result of extracting windows from one buffer or file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowReport {
    pub windows: u64,
}

/// Span of the next word at or after `from`
///
/// A word is a run of ASCII alphanumerics, optionally joined by single
/// apostrophes (`don't`, `rock'n'roll`). A trailing apostrophe is not part
/// of the word.
fn next_word(buffer: &[u8], from: usize) -> Option<Range<usize>> {
    let start = from + buffer.get(from..)?.iter().position(u8::is_ascii_alphanumeric)?;
    let mut end = start;

    while end < buffer.len() {
        if buffer[end].is_ascii_alphanumeric() {
            end += 1;
        } else if buffer[end] == b'\''
            && buffer.get(end + 1).is_some_and(u8::is_ascii_alphanumeric)
        {
            end += 2;
        } else {
            break;
        }
    }

    Some(start..end)
}

/// Iterator over the words of a buffer
#[derive(Debug, Clone)]
pub struct Words<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let word = next_word(self.buffer, self.pos)?;
        self.pos = word.end;
        Some(&self.buffer[word])
    }
}

/// Split `buffer` into words
///
/// # Example
/// ```
/// use freqscan::scan::words;
///
/// let found: Vec<&[u8]> = words(b"it's 'quoted' rock'n'roll").collect();
/// assert_eq!(found, [&b"it's"[..], &b"quoted"[..], &b"rock'n'roll"[..]]);
/// ```
pub fn words(buffer: &[u8]) -> Words<'_> {
    Words { buffer, pos: 0 }
}

/// Add every sliding window of `word_count` consecutive words in `buffer`
/// to `map`, each weighted by `multiplier`
///
/// Windows overlap by `word_count - 1` words; a short window at the end of
/// the buffer is dropped. The buffer is expected to be case-folded already.
/// Windows collect in a scratch map, so `map` is left untouched on error.
pub fn extract_windows_from_buffer(
    map: &mut FrequencyMap,
    buffer: &[u8],
    word_count: usize,
    multiplier: f64,
) -> Result<WindowReport> {
    if word_count == 0 {
        return Err(FreqError::InvalidWordCount(word_count));
    }

    merge_on_success(map, |scratch| {
        window_pass(buffer, word_count, |window| scratch.increment(window, multiplier))
    })
}

/// Walk every full window of `word_count` words, handing each to `visit`
fn window_pass<F>(buffer: &[u8], word_count: usize, mut visit: F) -> Result<WindowReport>
where
    F: FnMut(&str) -> Result<()>,
{
    let mut report = WindowReport::default();
    let mut window = String::new();
    let mut start = 0;

    loop {
        window.clear();
        let mut pos = start;
        let mut taken = 0;
        let mut after_first = start;

        while taken < word_count {
            let Some(word) = next_word(buffer, pos) else {
                break;
            };
            if taken > 0 {
                window.push(' ');
            }
            window.extend(buffer[word.clone()].iter().map(|&b| b as char));
            if taken == 0 {
                after_first = word.end;
            }
            pos = word.end;
            taken += 1;
        }

        if taken < word_count {
            break;
        }

        visit(&window)?;
        report.windows += 1;
        start = after_first;
    }

    Ok(report)
}

/// Load the file at `path`, fold it to lowercase and add its word windows
/// to `map`
///
/// # Errors
/// `InvalidWordCount` for `word_count == 0` (checked before reading),
/// `Read` if the file cannot be read.
pub fn extract_windows(
    map: &mut FrequencyMap,
    path: &Path,
    word_count: usize,
    multiplier: f64,
) -> Result<WindowReport> {
    if word_count == 0 {
        return Err(FreqError::InvalidWordCount(word_count));
    }

    let buffer = loader::load_folded(path)?;
    let report = extract_windows_from_buffer(map, &buffer, word_count, multiplier)?;

    tracing::debug!(
        file = %path.display(),
        windows = report.windows,
        word_count,
        "extracted word windows"
    );
    Ok(report)
}
