//! Boundary detection for the splitter passes.
//!
//! Pure functions that locate paragraph, sentence and word breaks. Blank
//! units are never returned, so a pass that yields more than one unit always
//! has real content on both sides of every break.

use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whitespace-separated words of `text`.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Split `text` on blank-line boundaries.
pub fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Split `text` after sentence-ending punctuation.
///
/// A break is a single whitespace character directly preceded by `.`, `?`
/// or `!`. Two abbreviation shapes suppress the break: initialisms such as
/// `U.S.` (word char, dot, word char, terminator) and capitalized titles
/// such as `Mr.` or `Dr.` (upper, lower, dot).
pub fn sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    // Last four characters seen, most recent last.
    let mut window: [Option<char>; 4] = [None; 4];

    for (idx, c) in text.char_indices() {
        if c.is_whitespace() && is_sentence_break(&window) {
            units.push(&text[start..idx]);
            start = idx + c.len_utf8();
        }
        window.rotate_left(1);
        window[3] = Some(c);
    }
    units.push(&text[start..]);

    units.retain(|s| !s.trim().is_empty());
    units
}

fn is_sentence_break(window: &[Option<char>; 4]) -> bool {
    let [p4, p3, p2, p1] = *window;

    if !matches!(p1, Some('.' | '?' | '!')) {
        return false;
    }

    let initialism = p4.is_some_and(is_word_char)
        && p3 == Some('.')
        && p2.is_some_and(is_word_char);
    if initialism {
        return false;
    }

    let title = p3.is_some_and(|c| c.is_ascii_uppercase())
        && p2.is_some_and(|c| c.is_ascii_lowercase())
        && p1 == Some('.');

    !title
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
