//! HTTP server: router construction and the listener loop.
//!
//! Four routes on top of a static-file fallback: the OAuth callback, the
//! token read-back endpoint, a health probe, and everything else handled
//! by `ServeDir` over the frontend directory.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{FromRef, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::cookie::Key;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::oauth::OAuthClient;
use crate::session::SessionStore;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub oauth: OAuthClient,
    pub sessions: SessionStore,
    key: Key,
}

// Lets SignedCookieJar pull its signing key out of the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Create the HTTP router.
///
/// Spawns the session janitor, so this must run inside a Tokio runtime.
#[must_use]
pub fn create_router(config: Arc<Config>, oauth: OAuthClient) -> Router {
    let sessions = SessionStore::new();
    sessions.clone().start_janitor();

    let key = config.signing_key();
    let static_dir = config.static_dir.clone();

    let state = AppState { config, oauth, sessions, key };

    Router::new()
        .route("/health", get(health_check))
        .route("/oauth/callback", get(routes::oauth_callback))
        .route("/api/token", get(routes::get_token))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until shutdown.
///
/// # Errors
///
/// Returns error on bind or serve failure.
pub async fn serve(router: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("HTTP server shut down");
    Ok(())
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let session_count = state.sessions.count().await;
    Json(serde_json::json!({
        "status": "ok",
        "service": "testbed-host",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": session_count
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
