//! Request-scoped caller context.
//!
//! Handlers build one of these per request and pass it into services
//! explicitly; nothing in the crate keeps an ambient "current user".

use uuid::Uuid;

/// Authenticated caller, established by session cookie or bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Anonymous caller. Carries the session identifier the client presented,
/// if any, so that it can be discarded when a new session is issued.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Guest {
    pub session_id: Option<String>,
}

impl Guest {
    pub fn new(session_id: Option<String>) -> Self {
        Self { session_id }
    }
}
