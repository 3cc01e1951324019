//! Feed item and group types
//!
//! The JSON layout mirrors the backend link listing: `category` may also be
//! spelled `category_name`, and ids may be numeric.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Opaque item identifier
pub type ItemId = String;

/// Group (category) identifier
pub type GroupId = String;

/// A shareable content card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ItemId,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: String,
    #[serde(rename = "category", alias = "category_name")]
    pub group: GroupId,
    #[serde(rename = "is_sensitive", default, deserialize_with = "deserialize_flag")]
    pub sensitive: bool,
    #[serde(default)]
    pub url: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        group: impl Into<String>,
        sensitive: bool,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            group: group.into(),
            sensitive,
            url: String::new(),
        }
    }

    /// Set the destination URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// An ordered collection of items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feed {
    items: Vec<Item>,
}

impl Feed {
    pub fn new(items: Vec<Item>) -> Self {
        if let Some(id) = first_duplicate_id(&items) {
            tracing::warn!(id = %id, "Duplicate item id in feed; visibility is tracked per id");
        }
        Self { items }
    }

    /// Parse a feed from a JSON array of links; item ids must be unique
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        if let Some(id) = first_duplicate_id(&items) {
            return Err(Error::Feed(format!("Duplicate item id: {}", id)));
        }
        Ok(Self { items })
    }

    /// Load a feed from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Feed(format!("Cannot read feed {}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Distinct group ids in order of first appearance
    pub fn groups(&self) -> Vec<GroupId> {
        let mut groups: Vec<GroupId> = Vec::new();
        for item in &self.items {
            if !groups.contains(&item.group) {
                groups.push(item.group.clone());
            }
        }
        groups
    }

    /// Items belonging to a group
    pub fn members<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.items.iter().filter(move |item| item.group == group)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn first_duplicate_id(items: &[Item]) -> Option<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.id.as_str())
        .find(|id| !seen.insert(*id))
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn deserialize_nullable<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// SQLite-backed listings report booleans as 0/1.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(i64),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Number(n)) => n != 0,
        None => false,
    })
}
