#![no_main]

use freqscan::freq_map::FrequencyMap;
use freqscan::scan::{extract_windows_from_buffer, scan_buffer, words, Overlap, RegexMatcher};
use libfuzzer_sys::fuzz_target;

const PATTERNS: [&str; 4] = ["[a-z]{2,2}", "((([a-z])+('[a-z])?)+)", "[a-z]*([a-z])", "..."];

fuzz_target!(|data: &[u8]| {
    // First byte picks the pattern and window size, the rest is the text
    let Some((&selector, text)) = data.split_first() else {
        return;
    };
    let mut buffer = text.to_vec();
    buffer.make_ascii_lowercase();

    let pattern = PATTERNS[selector as usize % PATTERNS.len()];
    let Ok(mut matcher) = RegexMatcher::compile(pattern) else {
        return;
    };
    let Ok(mut map) = FrequencyMap::new() else {
        return;
    };
    if let Ok(report) = scan_buffer(
        &mut map,
        &buffer,
        &mut matcher,
        Overlap::from_pattern(pattern),
        1.0,
    ) {
        assert_eq!(report.inserted + report.rejected, report.matches);
    }

    let word_count = (selector as usize / PATTERNS.len()) % 4 + 1;
    let total_words = words(&buffer).count();
    let Ok(mut windows) = FrequencyMap::new() else {
        return;
    };
    if let Ok(report) = extract_windows_from_buffer(&mut windows, &buffer, word_count, 1.0) {
        assert_eq!(
            report.windows as usize,
            (total_words + 1).saturating_sub(word_count)
        );
    }
});
