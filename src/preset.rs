//! Named patterns for the usual frequency tables
//!
//! A pattern with a capture group counts the group instead of the whole
//! match, e.g. `first-letter` matches a word and counts its first letter.

use clap::ValueEnum;

/// Built-in pattern presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Single letters
    Letters,
    /// Letter pairs
    Digraphs,
    /// Letter triples
    Trigraphs,
    /// Letters plus the punctuation of a 30-key layout
    Main30Chars,
    Main30Digraphs,
    Main30Trigraphs,
    /// Pairs of anything except whitespace
    DigraphsNospace,
    /// Any byte
    Chars,
    CharDigraphs,
    CharTrigraphs,
    /// Words, with internal apostrophes
    Words,
    /// Signed decimal numbers with optional fraction and exponent
    Numbers,
    FirstLetter,
    SecondLetter,
    ThirdLetter,
    LastLetter,
    FirstDigraph,
    LastDigraph,
}

impl Preset {
    /// Pattern source for this preset
    pub fn pattern(self) -> &'static str {
        match self {
            Preset::Letters => "[a-z]",
            Preset::Digraphs => "[a-z]{2,2}",
            Preset::Trigraphs => "[a-z]{3,3}",
            Preset::Main30Chars => "[a-z.,;']",
            Preset::Main30Digraphs => "[a-z.,;']{2,2}",
            Preset::Main30Trigraphs => "[a-z.,;']{3,3}",
            Preset::DigraphsNospace => "[^\n\t ]{2,2}",
            Preset::Chars => ".",
            Preset::CharDigraphs => "..",
            Preset::CharTrigraphs => "...",
            Preset::Words => "((([a-z])+('[a-z])?)+)",
            Preset::Numbers => r"((\+|-)?[0-9]+(\.[0-9]+)?((e|E)[0-9]+)?)",
            Preset::FirstLetter => "([a-z])[a-z]*",
            Preset::SecondLetter => "[a-z]([a-z])[a-z]*",
            Preset::ThirdLetter => "[a-z]{2,2}([a-z])[a-z]*",
            Preset::LastLetter => "[a-z]*([a-z])",
            Preset::FirstDigraph => "([a-z]{2,2})[a-z]*",
            Preset::LastDigraph => "[a-z]*([a-z]{2,2})",
        }
    }
}
