//! Cookie-keyed in-memory session store.
//!
//! Each browser gets one session, addressed by an opaque id carried in a
//! signed cookie. A session stores at most one thing: the access token
//! from the most recent successful exchange. The accessors are typed so
//! the absence state is explicit instead of a missing dictionary key.
//!
//! There is no logout and no token expiry; a background janitor only
//! bounds memory by evicting sessions idle past a fixed TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::config::defaults::{JANITOR_INTERVAL, SESSION_IDLE_TTL};

/// Per-browser session state.
struct Session {
    /// Most recent token, or `None` while unauthenticated (including the
    /// case where the provider answered 200 without an `access_token`).
    access_token: Option<String>,
    last_active: Instant,
}

impl Session {
    fn new() -> Self {
        Self { access_token: None, last_active: Instant::now() }
    }

    fn is_stale(&self) -> bool {
        self.last_active.elapsed() > SESSION_IDLE_TTL
    }
}

/// In-memory session store shared across request handlers.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Return the id of a live session, reusing `id` when it still exists
    /// and minting a fresh session otherwise.
    pub async fn get_or_create(&self, id: Option<&str>) -> String {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(session) = sessions.get_mut(id) {
                session.last_active = Instant::now();
                return id.to_owned();
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        sessions.insert(id.clone(), Session::new());
        tracing::debug!(session_id = %id, "Created new session");
        id
    }

    /// Overwrite the session's access token. `None` records an exchange
    /// that completed without a token; the session then reads as
    /// unauthenticated.
    ///
    /// No-op if the session does not exist.
    pub async fn set_access_token(&self, id: &str, token: Option<String>) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(id) {
            session.access_token = token;
            session.last_active = Instant::now();
        }
    }

    /// Read the session's access token. `None` for unknown sessions and
    /// for sessions that never completed an exchange.
    pub async fn access_token(&self, id: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        session.last_active = Instant::now();
        session.access_token.clone()
    }

    /// Session count (for monitoring).
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Evict sessions idle past the TTL. Returns the number removed.
    pub async fn cleanup_stale(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_stale());
        before - sessions.len()
    }

    /// Start the background janitor task.
    pub fn start_janitor(self) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(JANITOR_INTERVAL);
            loop {
                interval.tick().await;
                let cleaned = self.cleanup_stale().await;
                if cleaned > 0 {
                    tracing::debug!(count = cleaned, "Evicted stale sessions");
                }
            }
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish()
    }
}
