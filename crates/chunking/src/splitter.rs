//! Hierarchical text splitter.
//!
//! Splits one narrative into an ordered sequence of chunks that fit a word
//! budget. Boundaries are tried strictly in order:
//! 1. paragraphs (blank lines), greedily packed
//! 2. sentences, greedily packed with a character-level lookback seed
//! 3. sliding word windows with word-level overlap
//!
//! A pass is used only when it yields more than one unit. Oversized
//! paragraphs are re-split through an explicit work stack rather than by
//! recursion, so stack depth stays constant for any input.

use crate::boundary::{paragraphs, sentences, word_count, words};
use crate::types::ChunkSettings;

/// Pending work for the splitter.
enum Work<'a> {
    /// Text that still has to be checked against the budget.
    Split(&'a str),
    /// A finished chunk, emitted as-is when popped.
    Emit(String),
}

/// Budget-bounded splitter over paragraph, sentence and word boundaries.
#[derive(Debug, Clone, Copy)]
pub struct RecursiveSplitter {
    settings: ChunkSettings,
}

impl RecursiveSplitter {
    /// Create a splitter for validated settings.
    pub fn new(settings: ChunkSettings) -> Self {
        Self { settings }
    }

    /// Settings this splitter was built with.
    pub fn settings(&self) -> ChunkSettings {
        self.settings
    }

    /// Split `text` into chunks within the word budget.
    ///
    /// Text that already fits is returned unchanged as a single chunk. Blank
    /// text yields no chunks. A single sentence longer than the budget is
    /// emitted whole.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chunk_size = self.settings.chunk_size();
        let mut chunks = Vec::new();
        let mut stack = vec![Work::Split(text)];

        while let Some(work) = stack.pop() {
            let current = match work {
                Work::Emit(chunk) => {
                    chunks.push(chunk);
                    continue;
                }
                Work::Split(current) => current,
            };

            if word_count(current) <= chunk_size {
                chunks.push(current.to_string());
                continue;
            }

            let paras = paragraphs(current);
            if paras.len() > 1 {
                tracing::trace!(paragraphs = paras.len(), "Paragraph pass");
                let plan = self.pack_paragraphs(&paras);
                // Reverse so the first planned item is popped first.
                for item in plan.into_iter().rev() {
                    if let Work::Split(part) = item {
                        debug_assert!(part.len() < current.len(), "re-split must shrink input");
                    }
                    stack.push(item);
                }
                continue;
            }

            let sents = sentences(current);
            if sents.len() > 1 {
                tracing::trace!(sentences = sents.len(), "Sentence pass");
                chunks.extend(self.pack_sentences(&sents));
                continue;
            }

            tracing::trace!("Word pass");
            chunks.extend(self.word_windows(current));
        }

        chunks
    }

    /// Greedily pack paragraphs, queueing oversized ones for a re-split.
    fn pack_paragraphs<'a>(&self, paras: &[&'a str]) -> Vec<Work<'a>> {
        let chunk_size = self.settings.chunk_size();
        let mut plan = Vec::new();
        let mut buffer = Packer::new("\n\n");

        for para in paras {
            let para_words = word_count(para);

            if para_words > chunk_size {
                if let Some(chunk) = buffer.take() {
                    plan.push(Work::Emit(chunk));
                }
                plan.push(Work::Split(para));
                continue;
            }

            if buffer.words + para_words <= chunk_size {
                buffer.push(para, para_words);
            } else {
                if let Some(chunk) = buffer.take() {
                    plan.push(Work::Emit(chunk));
                }
                buffer.push(para, para_words);
            }
        }

        if let Some(chunk) = buffer.take() {
            plan.push(Work::Emit(chunk));
        }

        plan
    }

    /// Greedily pack sentences. After each overflow flush, the next buffer
    /// starts with the last `chunk_overlap` characters of the flushed chunk
    /// unless that seed would push it over budget.
    fn pack_sentences(&self, sents: &[&str]) -> Vec<String> {
        let chunk_size = self.settings.chunk_size();
        let overlap = self.settings.chunk_overlap();
        let mut chunks = Vec::new();
        let mut buffer = Packer::new(" ");

        for sent in sents {
            let sent_words = word_count(sent);

            if buffer.words + sent_words <= chunk_size {
                buffer.push(sent, sent_words);
                continue;
            }

            if let Some(flushed) = buffer.take() {
                let seed = tail_chars(&flushed, overlap).trim_start();
                let seed_words = word_count(seed);
                if seed_words > 0 && seed_words + sent_words <= chunk_size {
                    buffer.push(seed, seed_words);
                }
                chunks.push(flushed);
            }
            buffer.push(sent, sent_words);
        }

        if let Some(chunk) = buffer.take() {
            chunks.push(chunk);
        }

        chunks
    }

    /// Sliding windows of `chunk_size` words advancing by the stride.
    fn word_windows(&self, text: &str) -> Vec<String> {
        let chunk_size = self.settings.chunk_size();
        let stride = self.settings.stride();
        debug_assert!(stride > 0, "word windows must advance");

        let tokens = words(text);
        (0..tokens.len())
            .step_by(stride)
            .map(|start| {
                let end = (start + chunk_size).min(tokens.len());
                tokens[start..end].join(" ")
            })
            .collect()
    }
}

/// Running buffer of joined units with its word count.
struct Packer {
    separator: &'static str,
    text: String,
    words: usize,
}

impl Packer {
    fn new(separator: &'static str) -> Self {
        Self {
            separator,
            text: String::new(),
            words: 0,
        }
    }

    fn push(&mut self, unit: &str, unit_words: usize) {
        if !self.text.is_empty() {
            self.text.push_str(self.separator);
        }
        self.text.push_str(unit);
        self.words += unit_words;
    }

    /// Trimmed buffer contents, or `None` if blank. Resets the buffer.
    fn take(&mut self) -> Option<String> {
        let text = std::mem::take(&mut self.text);
        self.words = 0;
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Last `n` characters of `text`.
fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(ChunkSettings::new(chunk_size, chunk_overlap).unwrap())
    }

    fn numbered_words(prefix: &str, n: usize) -> String {
        (0..n)
            .map(|i| format!("{}{}", prefix, i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_fits_returns_text_unchanged() {
        let text = "  short narrative\nwith a newline  ";
        assert_eq!(splitter(10, 2).split(text), vec![text.to_string()]);
    }

    #[test]
    fn test_blank_text_yields_nothing() {
        assert!(splitter(10, 2).split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_paragraphs_are_packed() {
        let text = format!(
            "{}\n\n{}\n\n{}",
            numbered_words("a", 4),
            numbered_words("b", 4),
            numbered_words("c", 4)
        );
        let chunks = splitter(10, 2).split(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{}\n\n{}", numbered_words("a", 4), numbered_words("b", 4)));
        assert_eq!(chunks[1], numbered_words("c", 4));
    }

    #[test]
    fn test_oversized_paragraph_spliced_in_place() {
        let text = format!(
            "{}\n\n{}\n\n{}",
            numbered_words("a", 3),
            numbered_words("big", 25),
            numbered_words("c", 3)
        );
        let chunks = splitter(10, 0).split(&text);

        // a-para, three windows of the big paragraph, c-para
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0], numbered_words("a", 3));
        assert!(chunks[1].starts_with("big0 "));
        assert!(chunks[3].starts_with("big20 "));
        assert_eq!(chunks[4], numbered_words("c", 3));
        for chunk in &chunks {
            assert!(word_count(chunk) <= 10);
        }
    }

    #[test]
    fn test_sentence_pass_with_lookback_seed() {
        let text = "One two three four. Five six seven eight. Nine ten eleven twelve.";
        let chunks = splitter(9, 6).split(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "One two three four. Five six seven eight.");
        // The 6-character tail of the first chunk precedes the next sentence.
        assert_eq!(chunks[1], "eight. Nine ten eleven twelve.");
    }

    #[test]
    fn test_sentence_seed_dropped_when_over_budget() {
        let text = "a b c d e. f g h i j. k l m n o.";
        let chunks = splitter(5, 4).split(text);
        assert_eq!(chunks, vec!["a b c d e.", "f g h i j.", "k l m n o."]);
    }

    #[test]
    fn test_oversized_sentence_is_atomic() {
        let long = format!("{}.", numbered_words("w", 12));
        let text = format!("Short one. {} Tail here.", long);
        let chunks = splitter(5, 0).split(&text);

        assert_eq!(chunks, vec!["Short one.".to_string(), long, "Tail here.".to_string()]);
    }

    #[test]
    fn test_word_windows_offsets() {
        let text = numbered_words("w", 1200);
        let chunks = splitter(500, 50).split(&text);

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("w0 "));
        assert!(chunks[1].starts_with("w450 "));
        assert!(chunks[2].starts_with("w900 "));
        assert_eq!(word_count(&chunks[0]), 500);
        assert_eq!(word_count(&chunks[2]), 300);
    }

    #[test]
    fn test_word_windows_overlap() {
        let chunks = splitter(4, 1).split(&numbered_words("w", 10));
        assert_eq!(
            chunks,
            vec!["w0 w1 w2 w3", "w3 w4 w5 w6", "w6 w7 w8 w9", "w9"]
        );
    }

    #[test]
    fn test_single_giant_paragraph_without_breaks() {
        let text = numbered_words("x", 10_000);
        let chunks = splitter(100, 10).split(&text);
        assert_eq!(chunks.len(), 10_000usize.div_ceil(90));
    }

    #[test]
    fn test_tail_chars() {
        assert_eq!(tail_chars("hello", 0), "");
        assert_eq!(tail_chars("hello", 3), "llo");
        assert_eq!(tail_chars("hello", 10), "hello");
        assert_eq!(tail_chars("ação", 2), "ão");
    }
}
