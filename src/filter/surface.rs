//! Collaborator interfaces for the rendering layer
//!
//! The engine only ever asks for show/hide, text replacement, marker updates,
//! toasts and the confirmation prompt. Everything else about presentation
//! stays on the other side of these traits.

use super::gate::WarningNotice;
use crate::error::Result;

/// Class set on the document root while sensitive content is hidden
pub const ROOT_FILTER_CLASS: &str = "content-filter-enabled";

/// Text slot of an item that may carry highlight markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Description,
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// Label, icon and root class reflecting the current filter mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMarker {
    pub hide_sensitive: bool,
    pub label: &'static str,
    pub icon: &'static str,
    pub root_class: Option<&'static str>,
}

impl FilterMarker {
    pub fn for_state(hide_sensitive: bool) -> Self {
        if hide_sensitive {
            Self {
                hide_sensitive,
                label: "Show Sensitive Content",
                icon: "eye-slash",
                root_class: Some(ROOT_FILTER_CLASS),
            }
        } else {
            Self {
                hide_sensitive,
                label: "Hide Sensitive Content",
                icon: "eye",
                root_class: None,
            }
        }
    }
}

/// Addressable items and groups
pub trait RenderSurface {
    fn set_item_visible(&mut self, id: &str, visible: bool);

    fn set_group_visible(&mut self, group: &str, visible: bool);

    /// Replace an item's text in place
    fn replace_text(&mut self, id: &str, field: TextField, text: &str);

    fn set_filter_marker(&mut self, marker: &FilterMarker);
}

/// Toast sink
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Prompt shown before sensitive content is revealed
pub trait ConfirmationSurface {
    /// Show the prompt; an error aborts the reveal
    fn present(&mut self, notice: &WarningNotice) -> Result<()>;

    fn dismiss(&mut self);
}
