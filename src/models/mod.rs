//! Core data models: raw search hits and the records a sweep emits.

mod paper;
mod record;

pub use paper::{paper_id, truncate_chars, PaperRecord, MAX_ABSTRACT_CHARS};
pub use record::{Bib, RawRecord};
