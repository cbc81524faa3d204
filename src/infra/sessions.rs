//! Server-side sessions.
//!
//! A session is an opaque random identifier handed to the browser in a
//! cookie; the record it points to lives in Redis with a TTL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cache;
use crate::config::SESSION_ID_LENGTH;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Data stored behind a session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Uuid,
    pub email: String,
    pub remember: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist `data` under a new identifier and return the identifier.
    async fn create(&self, data: SessionData, lifetime_secs: u64) -> AppResult<String>;

    /// `None` for unknown or expired identifiers.
    async fn find(&self, session_id: &str) -> AppResult<Option<SessionData>>;

    /// Remove a session. Unknown identifiers are ignored.
    async fn destroy(&self, session_id: &str) -> AppResult<()>;
}

/// Random alphanumeric session identifier.
pub fn generate_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Redis-backed session store.
pub struct RedisSessionStore {
    cache: Cache,
}

impl RedisSessionStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, data: SessionData, lifetime_secs: u64) -> AppResult<String> {
        let session_id = generate_session_id();
        self.cache
            .set_session(&session_id, &data, lifetime_secs)
            .await?;
        Ok(session_id)
    }

    async fn find(&self, session_id: &str) -> AppResult<Option<SessionData>> {
        self.cache.get_session(session_id).await
    }

    async fn destroy(&self, session_id: &str) -> AppResult<()> {
        self.cache.delete_session(session_id).await
    }
}
