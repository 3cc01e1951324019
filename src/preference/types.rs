//! Preference endpoint wire types
//!
//! The remote record stores the inverse of the local flag: `show_sensitive`
//! is true when the filter is off.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/filter/preference`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPreferenceRequest {
    pub show_sensitive: bool,
}

impl FilterPreferenceRequest {
    /// Build the wire request for a local `hide_sensitive` value
    pub fn from_hide_sensitive(hide_sensitive: bool) -> Self {
        Self {
            show_sensitive: !hide_sensitive,
        }
    }
}

/// Response of the preference endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPreferenceResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_sensitive: Option<bool>,
}

impl FilterPreferenceResponse {
    pub fn ok(show_sensitive: bool) -> Self {
        Self {
            success: true,
            message: None,
            show_sensitive: Some(show_sensitive),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            show_sensitive: None,
        }
    }
}
