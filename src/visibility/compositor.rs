//! Per-item and per-group visibility
//!
//! `recompute` is a pure function of `(items, query, hide_sensitive)`: it is
//! rerun in full on every keystroke and every filter change, and two calls
//! with the same inputs produce equal maps.

use crate::feed::{GroupId, Item, ItemId};
use crate::search::{Query, SearchEngine};
use std::collections::BTreeMap;

/// Visibility decisions for one render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    items: BTreeMap<ItemId, bool>,
    groups: BTreeMap<GroupId, bool>,
    query_active: bool,
}

impl VisibilityMap {
    /// Unknown items are hidden
    pub fn item_visible(&self, id: &str) -> bool {
        self.items.get(id).copied().unwrap_or(false)
    }

    /// True iff at least one member item is visible; unknown groups are hidden
    pub fn group_visible(&self, group: &str) -> bool {
        self.groups.get(group).copied().unwrap_or(false)
    }

    pub fn items(&self) -> &BTreeMap<ItemId, bool> {
        &self.items
    }

    pub fn groups(&self) -> &BTreeMap<GroupId, bool> {
        &self.groups
    }

    pub fn visible_count(&self) -> usize {
        self.items.values().filter(|visible| **visible).count()
    }

    /// A non-empty query left nothing visible
    pub fn no_results(&self) -> bool {
        self.query_active && self.visible_count() == 0
    }
}

/// Which groups the user has narrowed the feed to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupSelection {
    #[default]
    All,
    Only(GroupId),
}

impl GroupSelection {
    /// Parse a selector value; `all` selects every group
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => Self::All,
            group => Self::Only(group.to_string()),
        }
    }

    pub fn includes(&self, group: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == group,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Only(group) => group,
        }
    }
}

/// Show/hide plus replacement text for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInstruction {
    pub id: ItemId,
    pub visible: bool,
    pub title: String,
    pub description: String,
}

/// Show/hide for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInstruction {
    pub group: GroupId,
    pub visible: bool,
}

/// Everything the rendering layer needs for one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub items: Vec<ItemInstruction>,
    pub groups: Vec<GroupInstruction>,
    pub no_results: bool,
}

/// Combines search and sensitivity predicates
#[derive(Debug, Clone, Default)]
pub struct VisibilityCompositor {
    engine: SearchEngine,
}

impl VisibilityCompositor {
    pub fn new(engine: SearchEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Decide visibility for every item and derive group visibility
    pub fn recompute(&self, items: &[Item], query: &Query, hide_sensitive: bool) -> VisibilityMap {
        let mut map = VisibilityMap {
            query_active: !query.is_empty(),
            ..VisibilityMap::default()
        };

        let highlighter = self.engine.highlighter(query);
        for item in items {
            let visible = highlighter.matches(item) && !(hide_sensitive && item.sensitive);
            map.items.insert(item.id.clone(), visible);

            let group = map.groups.entry(item.group.clone()).or_insert(false);
            *group |= visible;
        }

        tracing::debug!(
            items = items.len(),
            visible = map.visible_count(),
            query = %query.as_str(),
            hide_sensitive,
            "Recomputed visibility"
        );
        map
    }

    /// Turn a map into rendering instructions.
    ///
    /// Visible items get fresh highlight markup built from the original text;
    /// hidden items, and every item under an empty query, get the original
    /// text back. Groups outside `selection` are hidden without touching the
    /// derived map.
    pub fn plan(
        &self,
        items: &[Item],
        query: &Query,
        map: &VisibilityMap,
        selection: &GroupSelection,
    ) -> RenderPlan {
        let highlighter = self.engine.highlighter(query);

        let item_instructions = items
            .iter()
            .map(|item| {
                let visible = map.item_visible(&item.id);
                let (title, description) = if visible {
                    (
                        highlighter.render(&item.title),
                        highlighter.render(&item.description),
                    )
                } else {
                    (item.title.clone(), item.description.clone())
                };
                ItemInstruction {
                    id: item.id.clone(),
                    visible,
                    title,
                    description,
                }
            })
            .collect();

        let mut group_instructions: Vec<GroupInstruction> = Vec::new();
        for item in items {
            if group_instructions.iter().any(|g| g.group == item.group) {
                continue;
            }
            group_instructions.push(GroupInstruction {
                group: item.group.clone(),
                visible: map.group_visible(&item.group) && selection.includes(&item.group),
            });
        }

        RenderPlan {
            items: item_instructions,
            groups: group_instructions,
            no_results: map.no_results(),
        }
    }
}
