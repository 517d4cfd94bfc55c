//! Excerpt module
//!
//! Canonical text excerpts and their SQLite persistence.

mod store;

pub use store::{Excerpt, ExcerptDraft, ExcerptRepository};
