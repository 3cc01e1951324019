//! HTTP handlers for the preference backend
//!
//! Endpoints:
//! - POST /api/filter/preference : store `show_sensitive`
//! - GET  /api/filter/preference : read the stored record
//! - GET  /api/links             : feed listing (`include_sensitive`, `category`)
//! - GET  /api/categories        : group ids in feed order
//! - GET  /health                : liveness probe

use crate::config::ServerConfig;
use crate::error::Result;
use crate::feed::{Feed, Item};
use crate::preference::FilterPreferenceResponse;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Remote copy of the filter preference
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    pub show_sensitive: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shared state for preference handlers
#[derive(Clone)]
pub struct ServerState {
    pub preference: Arc<RwLock<PreferenceRecord>>,
    pub feed: Arc<Feed>,
}

impl ServerState {
    pub fn new(feed: Feed) -> Self {
        Self {
            preference: Arc::new(RwLock::new(PreferenceRecord::default())),
            feed: Arc::new(feed),
        }
    }
}

/// Create the preference router
pub fn preference_router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/api/filter/preference",
            get(get_preference).post(update_preference),
        )
        .route("/api/links", get(list_links))
        .route("/api/categories", get(list_categories))
        .with_state(state)
}

/// Full application: routes plus health probe, CORS and request tracing
pub fn build_app(state: ServerState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(preference_router(state))
        .layer(build_cors(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is interrupted
pub async fn serve(config: &ServerConfig, feed: Feed) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, items = feed.len(), "Preference backend listening");

    let app = build_app(ServerState::new(feed), &config.cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down preference backend");
        })
        .await?;
    Ok(())
}

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct PreferenceUpdate {
    #[serde(default)]
    show_sensitive: bool,
}

#[derive(Debug, Deserialize)]
struct LinksQuery {
    include_sensitive: Option<bool>,
    category: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/filter/preference
async fn update_preference(
    State(state): State<ServerState>,
    Json(update): Json<PreferenceUpdate>,
) -> impl IntoResponse {
    let mut record = state.preference.write().await;
    record.show_sensitive = update.show_sensitive;
    record.updated_at = Some(Utc::now());

    tracing::info!(show_sensitive = update.show_sensitive, "Filter preference stored");
    Json(FilterPreferenceResponse::ok(update.show_sensitive))
}

/// GET /api/filter/preference
async fn get_preference(State(state): State<ServerState>) -> impl IntoResponse {
    let record = state.preference.read().await;
    Json(serde_json::json!({
        "success": true,
        "show_sensitive": record.show_sensitive,
        "updatedAt": record.updated_at,
    }))
}

/// GET /api/links
async fn list_links(
    State(state): State<ServerState>,
    Query(params): Query<LinksQuery>,
) -> impl IntoResponse {
    let include_sensitive = match params.include_sensitive {
        Some(include) => include,
        None => state.preference.read().await.show_sensitive,
    };

    let links: Vec<Item> = state
        .feed
        .items()
        .iter()
        .filter(|item| include_sensitive || !item.sensitive)
        .filter(|item| {
            params
                .category
                .as_deref()
                .map_or(true, |category| item.group == category)
        })
        .cloned()
        .collect();
    Json(links)
}

/// GET /api/categories
async fn list_categories(State(state): State<ServerState>) -> impl IntoResponse {
    Json(state.feed.groups())
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let mut allowed: Vec<HeaderValue> = Vec::with_capacity(origins.len());
    for origin in origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) => allowed.push(value),
            Err(e) => tracing::warn!(origin = %origin, "Ignoring invalid CORS origin: {}", e),
        }
    }
    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins configured; cross-origin requests will be rejected");
    }
    cors.allow_origin(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteConfig;
    use crate::preference::RemoteSyncClient;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn make_state() -> ServerState {
        ServerState::new(Feed::new(vec![
            Item::new("1", "Ocean Waves", "calm", "nature", false),
            Item::new("2", "Storm Footage", "graphic", "nature", true),
            Item::new("3", "Rust Book", "learn rust", "tech", false),
        ]))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_preference(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/filter/preference")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_update_preference() {
        let state = make_state();
        let app = preference_router(state.clone());

        let resp = app
            .oneshot(post_preference(serde_json::json!({"show_sensitive": true})))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["show_sensitive"], true);

        let record = state.preference.read().await;
        assert!(record.show_sensitive);
        assert!(record.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_preference_missing_field_defaults_false() {
        let state = make_state();
        state.preference.write().await.show_sensitive = true;
        let app = preference_router(state.clone());

        let resp = app
            .oneshot(post_preference(serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!state.preference.read().await.show_sensitive);
    }

    #[tokio::test]
    async fn test_update_preference_malformed_body() {
        let app = preference_router(make_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/filter/preference")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_get_preference_default() {
        let app = preference_router(make_state());
        let resp = app.oneshot(get_request("/api/filter/preference")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["show_sensitive"], false);
        assert!(json["updatedAt"].is_null());
    }

    #[tokio::test]
    async fn test_list_links_follows_stored_preference() {
        let state = make_state();

        let resp = preference_router(state.clone())
            .oneshot(get_request("/api/links"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 2);

        state.preference.write().await.show_sensitive = true;
        let resp = preference_router(state)
            .oneshot(get_request("/api/links"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[1]["is_sensitive"], true);
        assert_eq!(json[1]["category"], "nature");
    }

    #[tokio::test]
    async fn test_list_links_explicit_params() {
        let app = preference_router(make_state());
        let resp = app
            .oneshot(get_request("/api/links?include_sensitive=true&category=nature"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        let ids: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|link| link["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_list_categories() {
        let app = preference_router(make_state());
        let resp = app.oneshot(get_request("/api/categories")).await.unwrap();
        let json = body_json(resp).await;
        assert_eq!(json, serde_json::json!(["nature", "tech"]));
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = build_app(make_state(), &[]);
        let resp = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
    }

    fn get_with_origin(uri: &str, origin: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("origin", origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origins_only() {
        let origins = vec![
            "http://localhost:5000".to_string(),
            "bad\norigin".to_string(),
        ];
        let app = build_app(make_state(), &origins);

        let resp = app
            .clone()
            .oneshot(get_with_origin("/health", "http://localhost:5000"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5000"
        );

        let resp = app
            .oneshot(get_with_origin("/health", "http://elsewhere.test"))
            .await
            .unwrap();
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_cors_any_origin_when_unconfigured() {
        let app = build_app(make_state(), &[]);
        let resp = app
            .oneshot(get_with_origin("/health", "http://elsewhere.test"))
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_remote_sync_end_to_end() {
        let state = make_state();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_app(state.clone(), &[]);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = RemoteSyncClient::from_config(&RemoteConfig {
            enabled: true,
            endpoint: format!("http://{}/api/filter/preference", addr),
            timeout_secs: 5,
        });

        client.push(false).unwrap().await.unwrap().unwrap();
        assert!(state.preference.read().await.show_sensitive);

        client.push(true).unwrap().await.unwrap().unwrap();
        assert!(!state.preference.read().await.show_sensitive);
    }

    #[tokio::test]
    async fn test_remote_sync_unreachable_endpoint() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RemoteSyncClient::from_config(&RemoteConfig {
            enabled: true,
            endpoint: format!("http://{}/api/filter/preference", addr),
            timeout_secs: 1,
        });
        assert!(client.push(true).unwrap().await.unwrap().is_err());
    }
}
