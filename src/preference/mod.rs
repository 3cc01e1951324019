//! Sensitive-content filter preference
//!
//! The local `PreferenceStore` is the single source of truth for whether
//! sensitive items are hidden. `RemoteSyncClient` mirrors changes to the
//! backend record on a best-effort basis and never feeds back into local
//! state.

pub mod store;
pub mod sync;
pub mod types;

pub use store::{FileStorage, MemoryStorage, PreferenceStore, StorageBackend};
pub use sync::{HttpPreferenceRemote, PreferenceRemote, RemoteSyncClient};
pub use types::{FilterPreferenceRequest, FilterPreferenceResponse};

/// Durable key for the filter flag (`"true"` = sensitive content hidden)
pub const FILTER_PREFERENCE_KEY: &str = "contentFilterEnabled";
