//! Normalized search query

use serde_json::Value;

/// A trimmed, case-insensitive query; empty means "no filter"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: String,
    needle: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let needle = text.to_lowercase();
        Self { text, needle }
    }

    /// The empty query
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from untyped input; anything but a string is treated as empty
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::new(s),
            other => {
                tracing::debug!(input = %other, "Non-string search input, using empty query");
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Trimmed query as typed
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Lowercased form used for containment checks
    pub fn needle(&self) -> &str {
        &self.needle
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trim_and_lowercase() {
        let query = Query::new("  Ocean WAVE ");
        assert_eq!(query.as_str(), "Ocean WAVE");
        assert_eq!(query.needle(), "ocean wave");
        assert!(!query.is_empty());
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(Query::new("   \t").is_empty());
        assert_eq!(Query::new(""), Query::empty());
    }

    #[test]
    fn test_from_value_non_string_is_empty() {
        assert!(Query::from_value(&json!(42)).is_empty());
        assert!(Query::from_value(&json!(null)).is_empty());
        assert!(Query::from_value(&json!({"q": "wave"})).is_empty());
        assert_eq!(Query::from_value(&json!("wave")).as_str(), "wave");
    }
}
