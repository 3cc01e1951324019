//! Sensitive-content filter control
//!
//! `FilterController` turns user events (filter toggle, search keystrokes,
//! confirmation answers) into preference commits and render passes.
//! Revealing sensitive content always goes through `ConfirmationGate`;
//! hiding it never does.

mod controller;
mod gate;
mod surface;

pub use controller::FilterController;
pub use gate::{ConfirmationGate, Dismissal, GateState, ToggleDecision, WarningNotice};
pub use surface::{
    ConfirmationSurface, FilterMarker, Notifier, RenderSurface, Severity, TextField,
    ROOT_FILTER_CLASS,
};
