use super::numbered_words;
use crate::assembler::assemble;
use crate::boundary::word_count;
use crate::types::SourceRecord;
use narrative_core::AppError;

#[test]
fn test_short_narrative_is_one_chunk() {
    let records = vec![SourceRecord::new("1001", "Credit Card", numbered_words("w", 50))];
    let assembly = assemble(&records, 512, 64).unwrap();

    assert_eq!(assembly.chunks.len(), 1);
    assert_eq!(assembly.chunks[0].sequence_index, 0);
    assert_eq!(assembly.chunks[0].start_offset, 0);
    assert_eq!(assembly.chunks[0].chunk_id, "1001_0");
}

#[test]
fn test_three_large_paragraphs_give_three_chunks() {
    let narrative = ["a", "b", "c"]
        .iter()
        .map(|p| numbered_words(p, 400))
        .collect::<Vec<_>>()
        .join("\n\n");
    let records = vec![SourceRecord::new("2002", "Personal Loan", narrative)];

    let assembly = assemble(&records, 512, 64).unwrap();
    let chunks = &assembly.chunks;

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, numbered_words("a", 400));
    assert_eq!(chunks[1].text, numbered_words("b", 400));
    assert_eq!(chunks[2].text, numbered_words("c", 400));
    let offsets: Vec<usize> = chunks.iter().map(|c| c.start_offset).collect();
    assert_eq!(offsets, vec![0, 448, 896]);
}

#[test]
fn test_flat_unpunctuated_narrative_uses_word_windows() {
    let records = vec![SourceRecord::new("3003", "BNPL", numbered_words("w", 1200))];
    let assembly = assemble(&records, 500, 50).unwrap();
    let chunks = &assembly.chunks;

    assert_eq!(chunks.len(), 3);
    let offsets: Vec<usize> = chunks.iter().map(|c| c.start_offset).collect();
    assert_eq!(offsets, vec![0, 450, 900]);
    for chunk in chunks {
        let first = chunk.text.split_whitespace().next().unwrap();
        assert_eq!(first, format!("w{}", chunk.start_offset));
        assert!(word_count(&chunk.text) <= 500);
    }
}

#[test]
fn test_empty_narrative_is_skipped() {
    let records = vec![SourceRecord::new("4004", "Savings Account", "")];
    let assembly = assemble(&records, 512, 64).unwrap();

    assert!(assembly.chunks.is_empty());
    assert_eq!(assembly.summary.records_skipped, 1);
    assert_eq!(assembly.summary.records_read, 1);
    assert_eq!(assembly.summary.chunks_produced, 0);
}

#[test]
fn test_overlap_equal_to_size_is_rejected() {
    let records = vec![SourceRecord::new("5005", "BNPL", "anything")];
    let result = assemble(&records, 256, 256);
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_abbreviations_do_not_break_sentences() {
    let sentence_a = format!("I met Mr. Jones at the U.S. branch {}.", numbered_words("a", 20));
    let sentence_b = format!("He said the fee was final {}.", numbered_words("b", 20));
    let narrative = format!("{} {}", sentence_a, sentence_b);
    let records = vec![SourceRecord::new("6006", "Credit Card", narrative)];

    let assembly = assemble(&records, 40, 0).unwrap();
    let texts: Vec<&str> = assembly.chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec![sentence_a.as_str(), sentence_b.as_str()]);
}
