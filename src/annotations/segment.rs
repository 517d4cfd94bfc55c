//! Text segmentation for rendering
//!
//! Partitions an excerpt's text into an ordered, gapless sequence of
//! plain and annotated segments. Renderers consume the sequence as-is;
//! they never recompute offsets.

use super::types::Annotation;

/// A contiguous, non-owning slice of the excerpt's text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Annotated {
        text: &'a str,
        annotation: &'a Annotation,
    },
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(text) => text,
            Segment::Annotated { text, .. } => text,
        }
    }

    pub fn annotation(&self) -> Option<&'a Annotation> {
        match self {
            Segment::Plain(_) => None,
            Segment::Annotated { annotation, .. } => Some(annotation),
        }
    }
}

/// Partition `text` into segments covering it exactly once.
///
/// `annotations` must be sorted by start and pairwise disjoint, which is
/// what [`super::IntervalIndex::list`] yields. Single left-to-right pass:
/// code-point offsets are converted to byte offsets incrementally, so the
/// whole partition is O(text length + annotation count).
///
/// Concatenating the segment texts in order reproduces `text` exactly.
/// Zero-length segments are never emitted: an annotation touching the
/// start or end of the text produces no empty plain neighbors.
pub fn segment<'a>(text: &'a str, annotations: &'a [Annotation]) -> Vec<Segment<'a>> {
    debug_assert!(annotations.windows(2).all(|p| p[0].end <= p[1].start));

    let mut segments = Vec::with_capacity(annotations.len() * 2 + 1);
    let mut cursor_char = 0;
    let mut cursor_byte = 0;

    for annotation in annotations {
        let start_byte = advance(text, cursor_byte, cursor_char, annotation.start);
        if annotation.start > cursor_char {
            segments.push(Segment::Plain(&text[cursor_byte..start_byte]));
        }
        let end_byte = advance(text, start_byte, annotation.start, annotation.end);
        segments.push(Segment::Annotated {
            text: &text[start_byte..end_byte],
            annotation,
        });
        cursor_char = annotation.end;
        cursor_byte = end_byte;
    }

    if cursor_byte < text.len() {
        segments.push(Segment::Plain(&text[cursor_byte..]));
    }

    segments
}

/// Byte offset of code point `target_char`, walking forward from a known
/// (`byte_pos`, `char_pos`) position.
fn advance(text: &str, byte_pos: usize, char_pos: usize, target_char: usize) -> usize {
    debug_assert!(target_char >= char_pos);
    if target_char == char_pos {
        return byte_pos;
    }
    text[byte_pos..]
        .char_indices()
        .nth(target_char - char_pos)
        .map(|(b, _)| byte_pos + b)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{annotations_for, text_with_disjoint_ranges};
    use super::super::types::TextRange;
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn annotation(id: i64, start: usize, end: usize, text: &str) -> Annotation {
        Annotation {
            id,
            excerpt_id: 1,
            start,
            end,
            selected_text: TextRange::new(start, end)
                .slice(text)
                .unwrap()
                .to_string(),
            comment: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn splits_around_a_single_annotation() {
        let text = "The quick brown fox";
        let annotations = vec![annotation(1, 4, 9, text)];

        let segments = segment(text, &annotations);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Plain("The "));
        assert_eq!(segments[1].text(), "quick");
        assert_eq!(segments[1].annotation().map(|a| a.id), Some(1));
        assert_eq!(segments[2], Segment::Plain(" brown fox"));
    }

    #[test]
    fn no_annotations_yields_one_plain_segment() {
        let text = "The quick brown fox";
        let segments = segment(text, &[]);
        assert_eq!(segments, vec![Segment::Plain(text)]);
    }

    #[test]
    fn empty_text_yields_no_segments() {
        assert!(segment("", &[]).is_empty());
    }

    #[test]
    fn full_span_annotation_yields_one_annotated_segment() {
        let text = "all of it";
        let annotations = vec![annotation(1, 0, text.chars().count(), text)];

        let segments = segment(text, &annotations);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text(), text);
        assert!(segments[0].annotation().is_some());
    }

    #[test]
    fn annotations_touching_the_edges_emit_no_empty_segments() {
        let text = "abcdef";
        let annotations = vec![annotation(1, 0, 2, text), annotation(2, 4, 6, text)];

        let segments = segment(text, &annotations);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text(), "ab");
        assert_eq!(segments[1], Segment::Plain("cd"));
        assert_eq!(segments[2].text(), "ef");
        assert!(segments.iter().all(|s| !s.text().is_empty()));
    }

    #[test]
    fn adjacent_annotations_stay_separate_segments() {
        let text = "abcdef";
        let annotations = vec![annotation(1, 0, 3, text), annotation(2, 3, 6, text)];

        let segments = segment(text, &annotations);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text(), "abc");
        assert_eq!(segments[1].text(), "def");
    }

    #[test]
    fn multibyte_text_is_sliced_on_code_point_boundaries() {
        let text = "pâté and jalapeño";
        let annotations = vec![annotation(1, 0, 4, text), annotation(2, 9, 17, text)];

        let segments = segment(text, &annotations);

        assert_eq!(segments[0].text(), "pâté");
        assert_eq!(segments[1], Segment::Plain(" and "));
        assert_eq!(segments[2].text(), "jalapeño");
    }

    proptest! {
        // The central property: the partition covers the text exactly
        // once, in order, for any disjoint annotation set.
        #[test]
        fn concatenated_segments_reproduce_the_text(
            (text, ranges) in text_with_disjoint_ranges(),
        ) {
            let annotations = annotations_for(&text, &ranges);
            let segments = segment(&text, &annotations);

            let joined: String = segments.iter().map(|s| s.text()).collect();
            prop_assert_eq!(joined, text);
        }

        #[test]
        fn every_annotation_appears_exactly_once_with_its_own_text(
            (text, ranges) in text_with_disjoint_ranges(),
        ) {
            let annotations = annotations_for(&text, &ranges);
            let segments = segment(&text, &annotations);

            let annotated: Vec<_> = segments
                .iter()
                .filter_map(|s| s.annotation().map(|a| (a.id, s.text())))
                .collect();
            prop_assert_eq!(annotated.len(), annotations.len());
            for (a, (id, text)) in annotations.iter().zip(annotated) {
                prop_assert_eq!(a.id, id);
                prop_assert_eq!(a.selected_text.as_str(), text);
            }
        }

        #[test]
        fn no_zero_length_segments_are_emitted(
            (text, ranges) in text_with_disjoint_ranges(),
        ) {
            let annotations = annotations_for(&text, &ranges);
            prop_assert!(segment(&text, &annotations)
                .iter()
                .all(|s| !s.text().is_empty()));
        }
    }
}
