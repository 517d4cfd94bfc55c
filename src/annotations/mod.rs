//! Annotation module
//!
//! The interval annotation model for one excerpt:
//!
//! - resolving a user's text selection to stable code-point offsets
//!   ([`resolver`])
//! - the ordered, disjoint set of annotation ranges ([`IntervalIndex`])
//! - partitioning the text into plain/annotated segments for rendering
//!   ([`segment`])
//! - the per-excerpt editing session gating in-memory mutations on store
//!   confirmation ([`ExcerptSession`])
//! - SQLite persistence ([`AnnotationRepository`])

mod index;
pub mod resolver;
mod segment;
mod session;
mod store;
#[cfg(test)]
pub(crate) mod testutil;
mod types;

pub use index::IntervalIndex;
pub use segment::{segment, Segment};
pub use session::ExcerptSession;
pub use store::AnnotationRepository;
pub use types::{Annotation, AnnotationDraft, AnnotationError, TextRange};
