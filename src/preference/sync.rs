//! Best-effort remote preference sync
//!
//! `RemoteSyncClient::push` spawns a detached task and returns immediately.
//! Overlapping pushes are allowed to race and whichever response lands last
//! decides the remote value; there is no ordering or cancellation. Failures
//! are logged and dropped, and local state is never rolled back.

use super::types::{FilterPreferenceRequest, FilterPreferenceResponse};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Transport to the backend preference record
#[async_trait]
pub trait PreferenceRemote: Send + Sync {
    async fn send(&self, request: FilterPreferenceRequest) -> Result<FilterPreferenceResponse>;
}

/// HTTP transport (`POST <endpoint>` with a JSON body)
pub struct HttpPreferenceRemote {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPreferenceRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PreferenceRemote for HttpPreferenceRemote {
    async fn send(&self, request: FilterPreferenceRequest) -> Result<FilterPreferenceResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote(format!(
                "{} returned HTTP {}",
                self.endpoint, status
            )));
        }

        Ok(response.json::<FilterPreferenceResponse>().await?)
    }
}

/// Fire-and-forget propagation of the filter preference
#[derive(Clone, Default)]
pub struct RemoteSyncClient {
    remote: Option<Arc<dyn PreferenceRemote>>,
}

impl RemoteSyncClient {
    pub fn new(remote: Arc<dyn PreferenceRemote>) -> Self {
        Self {
            remote: Some(remote),
        }
    }

    /// A client that never contacts a backend
    pub fn disabled() -> Self {
        Self { remote: None }
    }

    /// Build from configuration; a bad HTTP setup disables sync instead of failing
    pub fn from_config(config: &RemoteConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        match HttpPreferenceRemote::new(config) {
            Ok(remote) => Self::new(Arc::new(remote)),
            Err(e) => {
                tracing::warn!("Remote preference sync disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Push `hide_sensitive` to the backend without waiting for the result.
    ///
    /// The returned handle is only for observation; dropping it does not
    /// cancel the request. Returns `None` when sync is disabled or no tokio
    /// runtime is available.
    pub fn push(&self, hide_sensitive: bool) -> Option<JoinHandle<Result<()>>> {
        let remote = self.remote.clone()?;

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("No async runtime available, skipping remote preference push");
                return None;
            }
        };

        Some(runtime.spawn(async move {
            let result = push_once(remote.as_ref(), hide_sensitive).await;
            match &result {
                Ok(()) => tracing::debug!(hide_sensitive, "Remote filter preference updated"),
                Err(e) => tracing::warn!(
                    hide_sensitive,
                    "Failed to update remote filter preference: {}",
                    e
                ),
            }
            result
        }))
    }
}

async fn push_once(remote: &dyn PreferenceRemote, hide_sensitive: bool) -> Result<()> {
    let response = remote
        .send(FilterPreferenceRequest::from_hide_sensitive(hide_sensitive))
        .await?;

    if response.success {
        Ok(())
    } else {
        Err(Error::Remote(
            response
                .message
                .unwrap_or_else(|| "preference update rejected".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingRemote {
        sent: Mutex<Vec<FilterPreferenceRequest>>,
    }

    #[async_trait]
    impl PreferenceRemote for RecordingRemote {
        async fn send(
            &self,
            request: FilterPreferenceRequest,
        ) -> Result<FilterPreferenceResponse> {
            self.sent.lock().await.push(request);
            Ok(FilterPreferenceResponse::ok(request.show_sensitive))
        }
    }

    struct RejectingRemote;

    #[async_trait]
    impl PreferenceRemote for RejectingRemote {
        async fn send(
            &self,
            _request: FilterPreferenceRequest,
        ) -> Result<FilterPreferenceResponse> {
            Ok(FilterPreferenceResponse::rejected("Please log in first"))
        }
    }

    struct UnreachableRemote;

    #[async_trait]
    impl PreferenceRemote for UnreachableRemote {
        async fn send(
            &self,
            _request: FilterPreferenceRequest,
        ) -> Result<FilterPreferenceResponse> {
            Err(Error::Remote("connection refused".to_string()))
        }
    }

    /// Completes requests after a per-value delay so later pushes can finish first
    struct DelayedRemote {
        completed: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl PreferenceRemote for DelayedRemote {
        async fn send(
            &self,
            request: FilterPreferenceRequest,
        ) -> Result<FilterPreferenceResponse> {
            let delay = if request.show_sensitive { 50 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.completed.lock().await.push(request.show_sensitive);
            Ok(FilterPreferenceResponse::ok(request.show_sensitive))
        }
    }

    #[tokio::test]
    async fn test_push_sends_inverted_flag() {
        let remote = Arc::new(RecordingRemote::default());
        let client = RemoteSyncClient::new(remote.clone());

        let handle = client.push(true).unwrap();
        handle.await.unwrap().unwrap();

        let sent = remote.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].show_sensitive);
    }

    #[tokio::test]
    async fn test_rejection_is_reported_not_raised() {
        let client = RemoteSyncClient::new(Arc::new(RejectingRemote));
        let result = client.push(false).unwrap().await.unwrap();
        match result {
            Err(Error::Remote(msg)) => assert_eq!(msg, "Please log in first"),
            other => panic!("expected remote rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_contained() {
        let client = RemoteSyncClient::new(Arc::new(UnreachableRemote));
        let result = client.push(true).unwrap().await.unwrap();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_overlapping_pushes_complete_out_of_order() {
        let remote = Arc::new(DelayedRemote {
            completed: Mutex::new(Vec::new()),
        });
        let client = RemoteSyncClient::new(remote.clone());

        // hide=false (show_sensitive=true) is slow, hide=true is fast
        let first = client.push(false).unwrap();
        let second = client.push(true).unwrap();
        second.await.unwrap().unwrap();
        first.await.unwrap().unwrap();

        // The older push landed last, so it decides the remote value
        assert_eq!(*remote.completed.lock().await, vec![false, true]);
    }

    #[tokio::test]
    async fn test_dropped_handle_still_completes() {
        let remote = Arc::new(RecordingRemote::default());
        let client = RemoteSyncClient::new(remote.clone());

        drop(client.push(true));
        for _ in 0..50 {
            if !remote.sent.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(remote.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_client_is_noop() {
        let client = RemoteSyncClient::disabled();
        assert!(!client.is_enabled());
        assert!(client.push(true).is_none());
    }

    #[test]
    fn test_push_without_runtime_is_skipped() {
        let client = RemoteSyncClient::new(Arc::new(RecordingRemote::default()));
        assert!(client.push(true).is_none());
    }

    #[test]
    fn test_from_config_disabled() {
        let config = RemoteConfig {
            enabled: false,
            ..RemoteConfig::default()
        };
        assert!(!RemoteSyncClient::from_config(&config).is_enabled());
    }
}
