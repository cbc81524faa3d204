//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{AuthService, BookService, OtpService, RegistrationService, ServiceContainer};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub otp_service: Arc<dyn OtpService>,
    pub registration_service: Arc<dyn RegistrationService>,
    pub auth_service: Arc<dyn AuthService>,
    pub book_service: Arc<dyn BookService>,
    /// Set the `Secure` flag on the session cookie
    pub session_cookie_secure: bool,
    /// Probed by the health check when present
    pub database: Option<Arc<Database>>,
    /// Probed by the health check when present
    pub cache: Option<Cache>,
}

impl AppState {
    /// Build state from any service container, without infrastructure probes.
    pub fn new(services: &dyn ServiceContainer, config: &Config) -> Self {
        Self {
            otp_service: services.otp(),
            registration_service: services.registration(),
            auth_service: services.auth(),
            book_service: services.books(),
            session_cookie_secure: config.session_cookie_secure,
            database: None,
            cache: None,
        }
    }

    /// Attach live connections so `/health` can report on them.
    pub fn with_infra(mut self, database: Arc<Database>, cache: Cache) -> Self {
        self.database = Some(database);
        self.cache = Some(cache);
        self
    }
}
