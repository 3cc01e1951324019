//! Visibility composition
//!
//! Merges the search predicate with the sensitive-content predicate into a
//! per-item decision, then derives per-group visibility from the members.

mod compositor;

pub use compositor::{
    GroupInstruction, GroupSelection, ItemInstruction, RenderPlan, VisibilityCompositor,
    VisibilityMap,
};
