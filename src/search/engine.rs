//! Search matching and highlighting

use super::query::Query;
use crate::config::SearchConfig;
use crate::feed::Item;
use regex::{Captures, Regex, RegexBuilder};

/// Markup wrapped around each highlighted occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: "<mark>".to_string(),
            close: "</mark>".to_string(),
        }
    }
}

impl From<&SearchConfig> for HighlightMarker {
    fn from(config: &SearchConfig) -> Self {
        Self {
            open: config.highlight_open.clone(),
            close: config.highlight_close.clone(),
        }
    }
}

/// Item matcher and highlighter
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    marker: HighlightMarker,
}

impl SearchEngine {
    pub fn new(marker: HighlightMarker) -> Self {
        Self { marker }
    }

    pub fn marker(&self) -> &HighlightMarker {
        &self.marker
    }

    /// Whether the query occurs in the item's title, description or group
    pub fn matches(&self, item: &Item, query: &Query) -> bool {
        self.highlighter(query).matches(item)
    }

    /// Highlighter for one query, reused across every item of a render pass
    pub fn highlighter(&self, query: &Query) -> Highlighter {
        Highlighter::new(query, self.marker.clone())
    }

    /// Wrap every case-insensitive occurrence of the query in the marker
    pub fn render_highlighted(&self, text: &str, query: &Query) -> String {
        self.highlighter(query).render(text)
    }
}

#[derive(Debug, Clone)]
enum Pattern {
    /// Empty query: everything matches, nothing is marked
    Everything,
    Literal(Regex),
    /// The pattern could not be compiled
    Nothing,
}

/// Compiled pattern for a single query, shared by matching and highlighting
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Pattern,
    marker: HighlightMarker,
}

impl Highlighter {
    fn new(query: &Query, marker: HighlightMarker) -> Self {
        if query.is_empty() {
            return Self {
                pattern: Pattern::Everything,
                marker,
            };
        }

        // Query text is literal; never let it act as a pattern
        let pattern = RegexBuilder::new(&regex::escape(query.as_str()))
            .case_insensitive(true)
            .build();

        let pattern = match pattern {
            Ok(pattern) => Pattern::Literal(pattern),
            Err(e) => {
                tracing::warn!(query = %query.as_str(), "Cannot build search pattern: {}", e);
                Pattern::Nothing
            }
        };
        Self { pattern, marker }
    }

    /// Whether `text` contains the query; true for every text under an empty query
    pub fn is_match(&self, text: &str) -> bool {
        match &self.pattern {
            Pattern::Everything => true,
            Pattern::Literal(pattern) => pattern.is_match(text),
            Pattern::Nothing => false,
        }
    }

    /// Whether the query occurs in the item's title, description or group
    pub fn matches(&self, item: &Item) -> bool {
        [&item.title, &item.description, &item.group]
            .iter()
            .any(|field| self.is_match(field))
    }

    /// Highlight `text`, which must be the original unmarked text
    pub fn render(&self, text: &str) -> String {
        match &self.pattern {
            Pattern::Literal(pattern) => pattern
                .replace_all(text, |caps: &Captures| {
                    format!("{}{}{}", self.marker.open, &caps[0], self.marker.close)
                })
                .into_owned(),
            Pattern::Everything | Pattern::Nothing => text.to_string(),
        }
    }

    /// Byte ranges of each occurrence, for renderers that style spans directly
    pub fn ranges(&self, text: &str) -> Vec<std::ops::Range<usize>> {
        match &self.pattern {
            Pattern::Literal(pattern) => pattern.find_iter(text).map(|m| m.range()).collect(),
            Pattern::Everything | Pattern::Nothing => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocean() -> Item {
        Item::new("1", "Ocean Waves", "calm", "nature", false)
    }

    #[test]
    fn test_match_title_substring() {
        let engine = SearchEngine::default();
        assert!(engine.matches(&ocean(), &Query::new("wave")));
        assert!(engine.matches(&ocean(), &Query::new("OCEAN")));
    }

    #[test]
    fn test_match_description_and_group() {
        let engine = SearchEngine::default();
        assert!(engine.matches(&ocean(), &Query::new("calm")));
        assert!(engine.matches(&ocean(), &Query::new("natu")));
    }

    #[test]
    fn test_no_match() {
        let engine = SearchEngine::default();
        assert!(!engine.matches(&ocean(), &Query::new("zzz")));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let engine = SearchEngine::default();
        assert!(engine.matches(&ocean(), &Query::new("")));
        assert!(engine.matches(&ocean(), &Query::new("   ")));
    }

    #[test]
    fn test_special_characters_are_literal() {
        let engine = SearchEngine::default();
        let item = Item::new("2", "C++ (and) friends?", "price: $5.00", "tech", false);

        assert!(engine.matches(&item, &Query::new("c++")));
        assert!(engine.matches(&item, &Query::new("(and)")));
        assert!(engine.matches(&item, &Query::new("$5.00")));
        assert!(!engine.matches(&item, &Query::new("c.+")));
        assert!(!engine.matches(&ocean(), &Query::new(".*")));
    }

    #[test]
    fn test_highlight_once_case_insensitive() {
        let engine = SearchEngine::default();
        let marked = engine.render_highlighted("Ocean Waves", &Query::new("wave"));
        assert_eq!(marked, "Ocean <mark>Wave</mark>s");
        assert_eq!(marked.matches("<mark>").count(), 1);
    }

    #[test]
    fn test_highlight_every_occurrence() {
        let engine = SearchEngine::default();
        let marked = engine.render_highlighted("wave after WAVE", &Query::new("wave"));
        assert_eq!(marked, "<mark>wave</mark> after <mark>WAVE</mark>");
    }

    #[test]
    fn test_empty_query_restores_original() {
        let engine = SearchEngine::default();
        let original = "Ocean Waves";
        let _ = engine.render_highlighted(original, &Query::new("wave"));
        assert_eq!(engine.render_highlighted(original, &Query::empty()), original);
    }

    #[test]
    fn test_highlight_special_characters() {
        let engine = SearchEngine::default();
        let marked = engine.render_highlighted("a.b axb a.b", &Query::new("a.b"));
        assert_eq!(marked, "<mark>a.b</mark> axb <mark>a.b</mark>");

        let marked = engine.render_highlighted("cost $1 (approx)", &Query::new("$1 ("));
        assert_eq!(marked, "cost <mark>$1 (</mark>approx)");
    }

    #[test]
    fn test_custom_marker_with_dollar_signs() {
        let engine = SearchEngine::new(HighlightMarker {
            open: "[$1".to_string(),
            close: "]".to_string(),
        });
        assert_eq!(
            engine.render_highlighted("Ocean", &Query::new("oce")),
            "[$1Oce]an"
        );
    }

    #[test]
    fn test_matching_items_always_get_highlights() {
        let engine = SearchEngine::default();
        let item = Item::new("9", "İstanbul", "", "travel", false);

        for text in ["i", "İ", "stan", "STAN", "ß"] {
            let query = Query::new(text);
            let highlighter = engine.highlighter(&query);
            let highlighted = [&item.title, &item.description, &item.group]
                .iter()
                .any(|field| highlighter.render(field).contains("<mark>"));
            assert_eq!(engine.matches(&item, &query), highlighted, "query {:?}", text);
        }
        assert!(engine.matches(&item, &Query::new("stan")));
    }

    #[test]
    fn test_ranges() {
        let engine = SearchEngine::default();
        let highlighter = engine.highlighter(&Query::new("wave"));
        assert_eq!(highlighter.ranges("Ocean Waves wave"), vec![6..10, 12..16]);
        assert!(engine.highlighter(&Query::empty()).ranges("Ocean").is_empty());
    }
}
