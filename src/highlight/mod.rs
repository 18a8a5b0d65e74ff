//! Skill highlighting for the open job's description pane. Independent of the
//! card filter; it only shares the document.

pub mod highlighter;
pub mod taxonomy;

pub use highlighter::{process_job, HighlightReport};
