//! Selection-to-offset resolution
//!
//! Maps the text a user highlighted back to a stable `[start, end)`
//! code-point range in the excerpt's canonical text.
//!
//! Clients that know the absolute offsets of the selection should send
//! them and let [`resolve_at`] validate; [`resolve`]'s substring search is
//! the fallback for clients that only have the selected text. Substring
//! search cannot tell repeated occurrences apart and always picks the
//! leftmost one.

use super::types::{AnnotationError, TextRange};

/// Resolve a selection to the range of its first occurrence in `text`.
///
/// The selection is expected to be trimmed of surrounding whitespace.
/// Deterministic: identical inputs always produce the identical range.
pub fn resolve(text: &str, selection: &str) -> Result<TextRange, AnnotationError> {
    if selection.is_empty() {
        return Err(AnnotationError::EmptySelection);
    }

    let byte_start = text
        .find(selection)
        .ok_or(AnnotationError::SelectionNotFound)?;

    let start = text[..byte_start].chars().count();
    let end = start + selection.chars().count();
    Ok(TextRange::new(start, end))
}

/// Resolve a selection whose absolute offsets the client already knows.
///
/// The offsets are authoritative; the selection is only checked against
/// the text at that range. A mismatch is a rejection, not a cue to fall
/// back to substring search, since the client claimed to know the
/// position.
pub fn resolve_at(
    text: &str,
    selection: &str,
    range: TextRange,
) -> Result<TextRange, AnnotationError> {
    if selection.is_empty() {
        return Err(AnnotationError::EmptySelection);
    }
    range.validate(text.chars().count())?;

    let actual = range.slice(text).ok_or(AnnotationError::InvalidRange {
        start: range.start,
        end: range.end,
        len: text.chars().count(),
    })?;
    if actual != selection {
        return Err(AnnotationError::SelectionMismatch {
            start: range.start,
            end: range.end,
        });
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_occurrence() {
        let range = resolve("The quick brown fox", "quick").unwrap();
        assert_eq!(range, TextRange::new(4, 9));
    }

    #[test]
    fn repeated_substring_resolves_to_leftmost_match() {
        // "cat" occurs at [0,3) and [4,7); substring search cannot tell
        // which one was highlighted and picks the first.
        let range = resolve("cat cat", "cat").unwrap();
        assert_eq!(range, TextRange::new(0, 3));
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(
            resolve("some text", ""),
            Err(AnnotationError::EmptySelection)
        );
    }

    #[test]
    fn missing_selection_is_rejected() {
        assert_eq!(
            resolve("some text", "absent"),
            Err(AnnotationError::SelectionNotFound)
        );
    }

    #[test]
    fn resolve_is_deterministic() {
        let text = "to be or not to be";
        assert_eq!(resolve(text, "to be"), resolve(text, "to be"));
    }

    #[test]
    fn offsets_count_code_points() {
        // "héllo" spans bytes 7..13 but code points 6..11.
        let range = resolve("naïve héllo", "héllo").unwrap();
        assert_eq!(range, TextRange::new(6, 11));
    }

    #[test]
    fn resolve_at_accepts_a_matching_range() {
        let text = "cat cat";
        let range = resolve_at(text, "cat", TextRange::new(4, 7)).unwrap();
        // The client's offsets win over the leftmost occurrence.
        assert_eq!(range, TextRange::new(4, 7));
    }

    #[test]
    fn resolve_at_rejects_a_mismatching_range() {
        let text = "The quick brown fox";
        assert_eq!(
            resolve_at(text, "quick", TextRange::new(0, 5)),
            Err(AnnotationError::SelectionMismatch { start: 0, end: 5 })
        );
    }

    #[test]
    fn resolve_at_rejects_out_of_bounds_ranges() {
        let text = "short";
        assert!(matches!(
            resolve_at(text, "short", TextRange::new(0, 99)),
            Err(AnnotationError::InvalidRange { .. })
        ));
    }
}
