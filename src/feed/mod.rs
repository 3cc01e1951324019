//! Feed data model
//!
//! Items (shared links) and the groups (categories) they belong to. Both are
//! read-only to the search and visibility engine.

mod types;

pub use types::{Feed, GroupId, Item, ItemId};
