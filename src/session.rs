use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Role;

/// Session payload held server-side. The browser only ever sees the opaque
/// session id; role and user id stay on this side of the cookie.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: i64,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// SessionStore
///
/// Abstract contract for session persistence, so the in-memory store used
/// here and in tests can be swapped for an external one (the deployment
/// that inspired this portal kept sessions in Redis) without touching the
/// extractor or the auth handlers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a session and returns the opaque id to be set as a cookie.
    async fn create(&self, user_id: i64, role: Role, ttl: Duration) -> Uuid;

    /// Resolves a session id to its payload. Expired sessions resolve to
    /// `None` and are dropped.
    async fn resolve(&self, session_id: Uuid) -> Option<SessionData>;

    /// Removes a session (logout). Removing an unknown id is a no-op.
    async fn destroy(&self, session_id: Uuid);
}

/// SessionState
///
/// The shared handle stored in the application state.
pub type SessionState = Arc<dyn SessionStore>;

/// InMemorySessionStore
///
/// Process-local session map guarded by an async RwLock. Expiry is lazy:
/// a session past its deadline is evicted on the resolve that finds it.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SessionData>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, user_id: i64, role: Role, ttl: Duration) -> Uuid {
        let session_id = Uuid::new_v4();
        let data = SessionData {
            user_id,
            role,
            expires_at: Utc::now() + ttl,
        };
        self.sessions.write().await.insert(session_id, data);
        session_id
    }

    async fn resolve(&self, session_id: Uuid) -> Option<SessionData> {
        let expired = {
            let sessions = self.sessions.read().await;
            match sessions.get(&session_id) {
                None => return None,
                Some(data) if data.expires_at > Utc::now() => return Some(data.clone()),
                Some(_) => true,
            }
        };
        if expired {
            self.sessions.write().await.remove(&session_id);
        }
        None
    }

    async fn destroy(&self, session_id: Uuid) {
        self.sessions.write().await.remove(&session_id);
    }
}
