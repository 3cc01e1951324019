//! LinkHub - live search and sensitive-content visibility for a link feed
//!
//! The engine decides, for every item in a grouped feed, whether it is shown.
//! Two predicates combine: a live text search and a sensitive-content filter
//! whose preference persists locally and is mirrored to a backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      FilterController                         │
//! │   toggle / search / confirm / cancel  →  render pass          │
//! │                                                               │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌─────────────┐  │
//! │  │ ConfirmationGate │  │ PreferenceStore  │  │ RemoteSync  │  │
//! │  │ Idle / Awaiting  │  │ durable flag     │  │ best-effort │  │
//! │  └──────────────────┘  └──────────────────┘  └──────┬──────┘  │
//! │                                                     │         │
//! │  ┌───────────────────────────────────────────┐      │ HTTP    │
//! │  │ VisibilityCompositor                      │      │         │
//! │  │   SearchEngine (match + highlight)        │      │         │
//! │  │   + hide_sensitive  →  VisibilityMap      │      │         │
//! │  └───────────────────────────────────────────┘      │         │
//! └─────────────────────────────────────────────────────┼─────────┘
//!                                                       ▼
//!                                  server: /api/filter/preference
//! ```
//!
//! ## Rules
//!
//! - Hiding sensitive content takes effect immediately.
//! - Revealing it always waits for an explicit confirmation.
//! - The local store is the source of truth; remote sync never rolls it back.
//! - Visibility is recomputed in full on every change.

pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod preference;
pub mod search;
pub mod server;
pub mod visibility;

pub use config::LinkHubConfig;
pub use error::{Error, Result};
pub use feed::{Feed, Item};
pub use filter::FilterController;
