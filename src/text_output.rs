//! Plain-text frequency tables
//!
//! One `KEY WEIGHT` line per entry, heaviest first. Control characters in
//! keys are written as backslash escapes so every entry stays on one line.

use crate::freq_map::Pair;
use std::fmt::Write;

/// Shift-out, used by some corpora to mark a shifted key
pub const ASCII_SHIFT: char = '\x0e';

/// How control characters in a key are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escape {
    /// `\n`, `\t`, shift, backspace and backslash
    #[default]
    All,
    /// `\n`, shift and backspace only; tabs and backslashes stay literal
    Raw,
}

/// Escape the control characters of `key`
///
/// # Example
/// ```
/// use freqscan::text_output::{escape_sequence, Escape};
///
/// assert_eq!(escape_sequence("a\tb\n", Escape::All), "a\\tb\\n");
/// assert_eq!(escape_sequence("a\tb\n", Escape::Raw), "a\tb\\n");
/// ```
pub fn escape_sequence(key: &str, escape: Escape) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match (c, escape) {
            ('\n', _) => out.push_str("\\n"),
            (ASCII_SHIFT, _) => out.push_str("\\s"),
            ('\x08', _) => out.push_str("\\b"),
            ('\t', Escape::All) => out.push_str("\\t"),
            ('\\', Escape::All) => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}

/// Text formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOutput {
    /// Entries to print; 0 prints all
    pub top: usize,
    /// Digits after the decimal point
    pub precision: usize,
    pub escape: Escape,
    /// Keys only, space separated on one line
    pub keys_only: bool,
}

impl Default for TextOutput {
    fn default() -> Self {
        Self {
            top: 0,
            precision: 2,
            escape: Escape::All,
            keys_only: false,
        }
    }
}

impl TextOutput {
    pub fn render(&self, pairs: &[Pair]) -> String {
        let mut out = String::new();
        let shown = limit(pairs, self.top);

        if self.keys_only {
            let keys: Vec<String> = shown
                .iter()
                .map(|p| escape_sequence(&p.key, self.escape))
                .collect();
            out.push_str(&keys.join(" "));
            out.push('\n');
            return out;
        }

        for pair in shown {
            // Writing to a String cannot fail
            let _ = writeln!(
                out,
                "{} {:.*}",
                escape_sequence(&pair.key, self.escape),
                self.precision,
                pair.weight
            );
        }
        out
    }
}

/// First `top` pairs, or all of them for `top == 0`
pub fn limit(pairs: &[Pair], top: usize) -> &[Pair] {
    if top == 0 {
        pairs
    } else {
        &pairs[..top.min(pairs.len())]
    }
}

/// Render `pairs` as `KEY WEIGHT` lines with the default escaping
pub fn render_text(pairs: &[Pair], top: usize, precision: usize) -> String {
    TextOutput {
        top,
        precision,
        ..TextOutput::default()
    }
    .render(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, weight: f64) -> Pair {
        Pair {
            key: key.to_string(),
            weight,
        }
    }

    #[test]
    fn test_escape_all() {
        assert_eq!(escape_sequence("plain", Escape::All), "plain");
        assert_eq!(escape_sequence("a\\b", Escape::All), "a\\\\b");
        assert_eq!(escape_sequence("\x0e\x08", Escape::All), "\\s\\b");
        assert_eq!(escape_sequence(" \n", Escape::All), " \\n");
    }

    #[test]
    fn test_escape_raw_keeps_tab_and_backslash() {
        assert_eq!(escape_sequence("a\\b\t", Escape::Raw), "a\\b\t");
        assert_eq!(escape_sequence("\n\x0e\x08", Escape::Raw), "\\n\\s\\b");
    }

    #[test]
    fn test_render_text() {
        let pairs = vec![pair("e", 12.5), pair("t", 9.0), pair("\n", 1.0)];
        let text = render_text(&pairs, 0, 1);
        assert_eq!(text, "e 12.5\nt 9.0\n\\n 1.0\n");
    }

    #[test]
    fn test_render_top() {
        let pairs = vec![pair("a", 3.0), pair("b", 2.0), pair("c", 1.0)];
        assert_eq!(render_text(&pairs, 2, 0), "a 3\nb 2\n");
        assert_eq!(render_text(&pairs, 10, 0).lines().count(), 3);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_text(&[], 0, 2), "");
    }

    #[test]
    fn test_keys_only() {
        let pairs = vec![pair("th", 3.0), pair("he", 2.0), pair("a\tb", 1.0)];
        let output = TextOutput {
            keys_only: true,
            escape: Escape::Raw,
            top: 2,
            ..TextOutput::default()
        };
        assert_eq!(output.render(&pairs), "th he\n");
    }

    #[test]
    fn test_limit() {
        let pairs = vec![pair("a", 1.0)];
        assert_eq!(limit(&pairs, 0).len(), 1);
        assert_eq!(limit(&pairs, 5).len(), 1);
        assert!(limit(&[], 3).is_empty());
    }
}
