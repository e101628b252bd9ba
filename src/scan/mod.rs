// Pattern-driven frequency scanning
//
// Two entry points feed a FrequencyMap from a text buffer:
//
// - pattern: every match of a regular expression (letters, digraphs, words,
//   first letters via a capture group, ...), normalized so that each file
//   contributes exactly its multiplier in total.
// - window: sliding n-word windows, which a single pattern cannot express.
//
// Both case-fold the buffer to ASCII lowercase before scanning.

mod matcher;
mod pattern;
mod window;

pub use matcher::{MatchError, MatchSpans, Matcher, RegexMatcher};
pub use pattern::{
    is_legal_sequence, scan_buffer, scan_file, scan_file_with, scan_pass, Overlap, PassStats,
    ScanMode, ScanReport, MAX_SEQUENCE_LEN, SCAN_WINDOW,
};
pub use window::{extract_windows, extract_windows_from_buffer, words, WindowReport, Words};
