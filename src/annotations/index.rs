//! Per-excerpt interval index
//!
//! Owns the set of annotations for one excerpt and enforces the interval
//! invariants: every range is in bounds, ranges are pairwise disjoint
//! (adjacent is fine), and the collection stays sorted by start offset
//! with ids breaking ties. Because the ranges are disjoint, sorted-by-start
//! is also sorted-by-end, which lets lookups binary-search and lets the
//! segmenter scan in one pass.

use super::types::{Annotation, AnnotationError, TextRange};

/// Ordered, disjoint annotation set for a single excerpt.
///
/// One index exists per open editing session; it is rebuilt from the
/// store on load and never shared between sessions.
#[derive(Debug)]
pub struct IntervalIndex {
    text_len: usize,
    entries: Vec<Annotation>,
}

impl IntervalIndex {
    /// An empty index over a text of `text_len` code points.
    pub fn new(text_len: usize) -> Self {
        Self {
            text_len,
            entries: Vec::new(),
        }
    }

    /// Rebuild an index from stored records, re-verifying every record
    /// against the text it claims to annotate.
    ///
    /// The stored `selected_text` is checked against the text at the
    /// stored range rather than trusted; a mismatch means the store and
    /// the excerpt have diverged.
    pub fn from_records(
        text: &str,
        mut records: Vec<Annotation>,
    ) -> Result<Self, AnnotationError> {
        let text_len = text.chars().count();
        records.sort_by_key(|a| (a.start, a.id));

        for record in &records {
            record.range().validate(text_len)?;
            let actual = record
                .range()
                .slice(text)
                .ok_or(AnnotationError::InvalidRange {
                    start: record.start,
                    end: record.end,
                    len: text_len,
                })?;
            if actual != record.selected_text {
                return Err(AnnotationError::SelectionMismatch {
                    start: record.start,
                    end: record.end,
                });
            }
        }
        for pair in records.windows(2) {
            if pair[0].range().overlaps(pair[1].range()) {
                return Err(AnnotationError::Overlap {
                    start: pair[1].start,
                    end: pair[1].end,
                    conflicting_id: pair[0].id,
                });
            }
        }

        Ok(Self {
            text_len,
            entries: records,
        })
    }

    /// Code-point length of the text this index covers.
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Verify `range` is in bounds and free of conflicts, without
    /// inserting anything.
    pub fn check_range(&self, range: TextRange) -> Result<(), AnnotationError> {
        range.validate(self.text_len)?;
        match self.conflict_with(range) {
            Some(existing) => Err(AnnotationError::Overlap {
                start: range.start,
                end: range.end,
                conflicting_id: existing.id,
            }),
            None => Ok(()),
        }
    }

    /// Insert an annotation, keeping the set sorted and disjoint. A
    /// rejected insert leaves the index exactly as it was.
    pub fn insert(&mut self, annotation: Annotation) -> Result<&Annotation, AnnotationError> {
        self.check_range(annotation.range())?;
        let pos = self
            .entries
            .partition_point(|a| (a.start, a.id) < (annotation.start, annotation.id));
        self.entries.insert(pos, annotation);
        Ok(&self.entries[pos])
    }

    /// Replace the comment of an existing annotation. Offsets and order
    /// are untouched.
    pub fn update_comment(
        &mut self,
        id: i64,
        comment: &str,
    ) -> Result<&Annotation, AnnotationError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AnnotationError::NotFound(id))?;
        entry.comment = comment.to_string();
        Ok(entry)
    }

    /// Remove an annotation by id, returning the removed record.
    pub fn remove(&mut self, id: i64) -> Result<Annotation, AnnotationError> {
        let pos = self
            .entries
            .iter()
            .position(|a| a.id == id)
            .ok_or(AnnotationError::NotFound(id))?;
        Ok(self.entries.remove(pos))
    }

    pub fn get(&self, id: i64) -> Option<&Annotation> {
        self.entries.iter().find(|a| a.id == id)
    }

    /// All annotations, sorted by start ascending.
    pub fn list(&self) -> &[Annotation] {
        &self.entries
    }

    /// The annotation covering `offset`, if any. Binary search over the
    /// sort order; used for interactive highlighting only.
    pub fn covering(&self, offset: usize) -> Option<&Annotation> {
        let idx = self.entries.partition_point(|a| a.start <= offset);
        let candidate = self.entries[..idx].last()?;
        candidate.range().contains(offset).then_some(candidate)
    }

    fn conflict_with(&self, range: TextRange) -> Option<&Annotation> {
        // Disjoint + sorted means only the neighbors around the insertion
        // point can conflict.
        let pos = self.entries.partition_point(|a| a.start < range.start);
        if let Some(prev) = pos.checked_sub(1).and_then(|i| self.entries.get(i)) {
            if prev.range().overlaps(range) {
                return Some(prev);
            }
        }
        if let Some(next) = self.entries.get(pos) {
            if next.range().overlaps(range) {
                return Some(next);
            }
        }
        None
    }
}
