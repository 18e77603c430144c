//! Crate-level tests spanning the splitter, assembler and reporter.

mod scenarios;

use crate::types::SourceRecord;

/// Space-separated tokens `{prefix}0 .. {prefix}{n-1}`.
pub(crate) fn numbered_words(prefix: &str, n: usize) -> String {
    (0..n)
        .map(|i| format!("{}{}", prefix, i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic pseudo-random narratives with uniquely named tokens.
///
/// Sentences stay under 31 words; every third record has no punctuation.
pub(crate) fn generated_records(count: usize) -> Vec<SourceRecord> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move |bound: u64| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) % bound
    };

    (0..count)
        .map(|r| {
            let punctuated = r % 3 != 0;
            let paragraphs = 1 + next(4) as usize;
            let body = (0..paragraphs)
                .map(|p| {
                    let sentences = 1 + next(8) as usize;
                    (0..sentences)
                        .map(|s| {
                            let len = 3 + next(28) as usize;
                            let mut sentence = numbered_words(&format!("r{}p{}s{}w", r, p, s), len);
                            if punctuated {
                                sentence.push('.');
                            }
                            sentence
                        })
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            SourceRecord::new(r.to_string(), "Credit Card", body)
        })
        .collect()
}
