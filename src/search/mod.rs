//! Live feed search
//!
//! Literal, case-insensitive substring matching over item title, description
//! and group, plus highlight markup for the rendering layer.

mod engine;
mod query;

pub use engine::{HighlightMarker, Highlighter, SearchEngine};
pub use query::Query;
