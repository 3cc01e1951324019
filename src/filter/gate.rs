//! Confirmation Gate: guards the reveal of sensitive content
//!
//! ```text
//!            reveal request (true -> false)
//!   Idle ─────────────────────────────────▶ AwaitingConfirmation
//!    ▲                                            │
//!    └──────── confirm (commit false) ────────────┤
//!    └──────── cancel / dismiss / outside ────────┘
//! ```
//!
//! Any other request commits immediately. While a confirmation is pending,
//! further requests are ignored so only one prompt can exist.

use super::surface::ConfirmationSurface;

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    AwaitingConfirmation,
}

/// What the controller should do with a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleDecision {
    /// Commit the requested value now
    Commit(bool),
    /// Prompt shown; nothing committed yet
    AwaitConfirmation,
    /// A prompt is already pending
    Ignored,
    /// The prompt could not be shown; nothing changed
    Aborted,
}

/// Ways a pending confirmation can be dismissed without confirming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    CancelButton,
    CloseButton,
    EscapeKey,
    OutsideClick,
}

/// Content of the reveal prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningNotice {
    pub title: String,
    pub message: String,
    pub content_kinds: Vec<String>,
    pub prompt: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl Default for WarningNotice {
    fn default() -> Self {
        Self {
            title: "Sensitive Content Warning".to_string(),
            message: "You are about to view content that may be sensitive or disturbing to some users."
                .to_string(),
            content_kinds: vec![
                "Graphic or disturbing imagery".to_string(),
                "Mature themes".to_string(),
                "Strong language".to_string(),
                "Other potentially offensive material".to_string(),
            ],
            prompt: "Are you sure you want to proceed?".to_string(),
            confirm_label: "Show Content".to_string(),
            cancel_label: "Cancel".to_string(),
        }
    }
}

/// Two-state machine for the reveal confirmation
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    state: GateState,
    notice: WarningNotice,
}

impl ConfirmationGate {
    pub fn new(notice: WarningNotice) -> Self {
        Self {
            state: GateState::Idle,
            notice,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == GateState::AwaitingConfirmation
    }

    pub fn notice(&self) -> &WarningNotice {
        &self.notice
    }

    /// Route a request to move `hide_sensitive` from `current` to `requested`
    pub fn request<C: ConfirmationSurface>(
        &mut self,
        current: bool,
        requested: bool,
        surface: &mut C,
    ) -> ToggleDecision {
        if self.is_pending() {
            tracing::debug!("Confirmation already pending, ignoring filter request");
            return ToggleDecision::Ignored;
        }

        let reveal = current && !requested;
        if !reveal {
            return ToggleDecision::Commit(requested);
        }

        match surface.present(&self.notice) {
            Ok(()) => {
                self.state = GateState::AwaitingConfirmation;
                tracing::debug!("Awaiting confirmation to reveal sensitive content");
                ToggleDecision::AwaitConfirmation
            }
            Err(e) => {
                tracing::warn!("Cannot show sensitive content warning, aborting: {}", e);
                ToggleDecision::Aborted
            }
        }
    }

    /// User affirmed; returns the value to commit (`false`) if a prompt was pending
    pub fn confirm<C: ConfirmationSurface>(&mut self, surface: &mut C) -> Option<bool> {
        if !self.is_pending() {
            return None;
        }
        surface.dismiss();
        self.state = GateState::Idle;
        Some(false)
    }

    /// Drop a pending prompt without committing; returns whether one was pending
    pub fn cancel<C: ConfirmationSurface>(&mut self, reason: Dismissal, surface: &mut C) -> bool {
        if !self.is_pending() {
            return false;
        }
        surface.dismiss();
        self.state = GateState::Idle;
        tracing::debug!(?reason, "Sensitive content reveal cancelled");
        true
    }
}
