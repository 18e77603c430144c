//! Raw complaint preprocessing.
//!
//! Maps raw product labels onto the target categories, drops rows without a
//! narrative, and cleans narratives before chunking. Cleaning collapses all
//! whitespace, so cleaned narratives reach the splitter as flat text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::boundary::word_count;
use crate::types::{id_from_string_or_number, SourceRecord};

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)i am writing to file a complaint",
        r"(?i)dear (sir|madam|consumer financial protection bureau)",
        r"(?i)regarding my account [x\d]+",
        r"(?i)please see below for details",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("boilerplate pattern is valid"))
    .collect()
});

static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9\s.,;:!?'-]").expect("character filter pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Target product categories kept by preprocessing.
pub const TARGET_CATEGORIES: [&str; 5] = [
    "Credit Card",
    "Personal Loan",
    "BNPL",
    "Savings Account",
    "Money Transfer",
];

/// One row of the raw complaint export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawComplaint {
    #[serde(
        alias = "Complaint ID",
        alias = "id",
        deserialize_with = "id_from_string_or_number"
    )]
    pub complaint_id: String,

    #[serde(alias = "Product", default)]
    pub product: Option<String>,

    #[serde(alias = "Consumer complaint narrative", default)]
    pub narrative: Option<String>,
}

/// Counts from a preprocessing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessSummary {
    /// Raw rows seen
    pub rows_read: u64,

    /// Rows outside the target categories
    pub rows_filtered: u64,

    /// Target rows dropped for a missing or blank narrative
    pub empty_narratives: u64,

    /// Records produced
    pub records_kept: u64,
}

/// Map a raw product label onto its target category.
///
/// Returns `None` for products outside the target set.
pub fn normalize_product(label: &str) -> Option<&'static str> {
    match label.trim() {
        "Credit card" | "Credit Card" => Some("Credit Card"),
        "Personal loan" | "Personal Loan" | "Payday loan" | "Vehicle loan" => {
            Some("Personal Loan")
        }
        "Buy Now Pay Later" | "BNPL" => Some("BNPL"),
        "Savings account" | "Savings Account" => Some("Savings Account"),
        "Money transfers" | "Money Transfer" => Some("Money Transfer"),
        _ => None,
    }
}

/// Clean a complaint narrative.
///
/// Removes boilerplate openers, drops characters other than ASCII letters,
/// digits, whitespace and basic punctuation, collapses whitespace and
/// lowercases the result.
pub fn clean_narrative(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in BOILERPLATE.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    let cleaned = DISALLOWED_CHARS.replace_all(&cleaned, "");
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ");
    cleaned.trim().to_lowercase()
}

/// Turn raw rows into cleaned source records.
pub fn preprocess(raws: Vec<RawComplaint>) -> (Vec<SourceRecord>, PreprocessSummary) {
    let mut summary = PreprocessSummary::default();
    let mut records = Vec::new();

    for raw in raws {
        summary.rows_read += 1;

        let Some(category) = raw.product.as_deref().and_then(normalize_product) else {
            summary.rows_filtered += 1;
            continue;
        };

        let narrative = match raw.narrative.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                summary.empty_narratives += 1;
                continue;
            }
        };

        let cleaned = clean_narrative(narrative);
        records.push(SourceRecord {
            word_count: Some(word_count(&cleaned)),
            id: raw.complaint_id,
            category: category.to_string(),
            narrative: Some(cleaned),
        });
    }

    summary.records_kept = records.len() as u64;

    tracing::info!(
        rows_read = summary.rows_read,
        rows_filtered = summary.rows_filtered,
        empty_narratives = summary.empty_narratives,
        records_kept = summary.records_kept,
        "Preprocessing finished"
    );

    (records, summary)
}
