//! Preference backend
//!
//! Hosts the remote preference record that `RemoteSyncClient` writes to,
//! alongside a read-only feed listing that honours the stored preference.

pub mod handler;

pub use handler::{build_app, preference_router, serve, PreferenceRecord, ServerState};
