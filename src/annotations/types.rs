//! Annotation domain types
//!
//! An annotation binds a comment to a fixed `[start, end)` range of one
//! excerpt's canonical text. Offsets count Unicode code points, not bytes,
//! so they match what selection-aware clients report and stay valid across
//! the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A half-open `[start, end)` range of code-point offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of code points covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Two half-open ranges overlap iff `s1 < e2 && s2 < e1`.
    pub fn overlaps(&self, other: TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `offset` falls inside the range.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check the range is non-empty and fits a text of `text_len` code
    /// points.
    pub fn validate(&self, text_len: usize) -> Result<(), AnnotationError> {
        if self.is_empty() || self.end > text_len {
            return Err(AnnotationError::InvalidRange {
                start: self.start,
                end: self.end,
                len: text_len,
            });
        }
        Ok(())
    }

    /// Slice `text` by code-point offsets. Returns `None` when the range
    /// does not fit the text.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.end < self.start {
            return None;
        }
        let start = byte_offset(text, self.start)?;
        let end = byte_offset(text, self.end)?;
        text.get(start..end)
    }
}

/// Byte offset of the code point at `char_idx`, or `text.len()` when
/// `char_idx` equals the code-point count.
fn byte_offset(text: &str, char_idx: usize) -> Option<usize> {
    text.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .nth(char_idx)
}

/// A stored annotation.
///
/// `start`/`end` are immutable after creation; `comment` is the only field
/// that may change. Serialized with the `start_index`/`end_index` wire
/// names the original clients expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i64,
    pub excerpt_id: i64,
    #[serde(rename = "start_index")]
    pub start: usize,
    #[serde(rename = "end_index")]
    pub end: usize,
    pub selected_text: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Annotation {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

/// A user's annotation request: the selected text plus, when the client
/// can supply them, the absolute offsets of the selection. Offsets are
/// authoritative when present; the selected text alone is a fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationDraft {
    pub start_index: Option<usize>,
    pub end_index: Option<usize>,
    pub selected_text: String,
    #[serde(default)]
    pub comment: String,
}

/// Expected, recoverable rejections from the annotation core.
///
/// These are returned as values, not panics: callers branch on them and
/// map them to user-visible responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("selection is empty")]
    EmptySelection,

    #[error("selection not found in excerpt text")]
    SelectionNotFound,

    #[error("range {start}..{end} is invalid for a text of {len} characters")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("start_index and end_index must be provided together")]
    IncompleteRange,

    #[error("selected text does not match the excerpt at {start}..{end}")]
    SelectionMismatch { start: usize, end: usize },

    #[error("range {start}..{end} overlaps annotation {conflicting_id}")]
    Overlap {
        start: usize,
        end: usize,
        conflicting_id: i64,
    },

    #[error("annotation {0} not found")]
    NotFound(i64),
}
