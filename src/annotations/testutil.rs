//! Shared generators for the property tests.

use chrono::Utc;
use proptest::prelude::*;

use super::types::{Annotation, TextRange};

/// Random text together with a random set of disjoint, non-empty,
/// in-bounds code-point ranges over it.
pub fn text_with_disjoint_ranges() -> impl Strategy<Value = (String, Vec<TextRange>)> {
    "[a-z A-Zäöüß€-]{0,60}".prop_flat_map(|text| {
        let len = text.chars().count();
        let ranges = proptest::collection::vec((0..=len, 0..=len), 0..8)
            .prop_map(move |pairs| disjoint_ranges(pairs, len));
        (Just(text), ranges)
    })
}

/// Normalize arbitrary offset pairs into a sorted, disjoint range set.
fn disjoint_ranges(pairs: Vec<(usize, usize)>, len: usize) -> Vec<TextRange> {
    let mut ranges: Vec<TextRange> = pairs
        .into_iter()
        .map(|(a, b)| TextRange::new(a.min(b), a.max(b)))
        .filter(|r| !r.is_empty() && r.end <= len)
        .collect();
    ranges.sort_by_key(|r| r.start);

    let mut kept: Vec<TextRange> = Vec::new();
    for range in ranges {
        if kept.last().map_or(true, |prev| prev.end <= range.start) {
            kept.push(range);
        }
    }
    kept
}

/// Build annotation records for the given ranges, ids in range order.
pub fn annotations_for(text: &str, ranges: &[TextRange]) -> Vec<Annotation> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, range)| Annotation {
            id: i as i64 + 1,
            excerpt_id: 1,
            start: range.start,
            end: range.end,
            selected_text: range.slice(text).expect("generated in bounds").to_string(),
            comment: String::new(),
            created_at: Utc::now(),
        })
        .collect()
}
