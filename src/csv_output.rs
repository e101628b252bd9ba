//! CSV output format for frequency tables

use crate::freq_map::Pair;
use crate::text_output::limit;

/// CSV output formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsvOutput {
    /// Rows to write; 0 writes all
    pub top: usize,
    /// Digits after the decimal point, or shortest round-trip form if unset
    pub precision: Option<usize>,
}

impl CsvOutput {
    pub fn new(top: usize, precision: Option<usize>) -> Self {
        Self { top, precision }
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) || field.starts_with(' ') || field.ends_with(' ')
        {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_weight(&self, weight: f64) -> String {
        match self.precision {
            Some(precision) => format!("{weight:.precision$}"),
            None => weight.to_string(),
        }
    }

    /// Header plus one `key,weight` row per pair
    pub fn render(&self, pairs: &[Pair]) -> String {
        let mut output = String::from("key,weight\n");
        for pair in limit(pairs, self.top) {
            output.push_str(&Self::escape_field(&pair.key));
            output.push(',');
            output.push_str(&self.format_weight(pair.weight));
            output.push('\n');
        }
        output
    }
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
    fn test_header_only_when_empty() {
        assert_eq!(CsvOutput::default().render(&[]), "key,weight\n");
    }

    #[test]
    fn test_rows() {
        let pairs = vec![pair("th", 2.5), pair("he", 1.0)];
        let csv = CsvOutput::default().render(&pairs);
        assert_eq!(csv, "key,weight\nth,2.5\nhe,1\n");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(CsvOutput::escape_field("plain"), "plain");
        assert_eq!(CsvOutput::escape_field("a,b"), "\"a,b\"");
        assert_eq!(CsvOutput::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(CsvOutput::escape_field("a\nb"), "\"a\nb\"");
        assert_eq!(CsvOutput::escape_field(" a"), "\" a\"");
    }

    #[test]
    fn test_top_and_precision() {
        let pairs = vec![pair("a", 1.23456), pair("b", 0.5), pair("c", 0.25)];
        let csv = CsvOutput::new(2, Some(2)).render(&pairs);
        assert_eq!(csv, "key,weight\na,1.23\nb,0.50\n");
    }
}
