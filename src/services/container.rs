//! Service Container - Centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, BookService, Catalog, OtpIssuer, OtpService, Registrar,
    RegistrationService,
};
use crate::config::Config;
use crate::infra::{
    Cache, EventSink, Mailer, Persistence, RedisSessionStore, SessionStore, UnitOfWork,
    WelcomeMailSink,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn otp(&self) -> Arc<dyn OtpService>;

    fn registration(&self) -> Arc<dyn RegistrationService>;

    fn auth(&self) -> Arc<dyn AuthService>;

    fn books(&self) -> Arc<dyn BookService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    otp_service: Arc<dyn OtpService>,
    registration_service: Arc<dyn RegistrationService>,
    auth_service: Arc<dyn AuthService>,
    book_service: Arc<dyn BookService>,
}

impl Services {
    /// Create a new service container from already built services
    pub fn new(
        otp_service: Arc<dyn OtpService>,
        registration_service: Arc<dyn RegistrationService>,
        auth_service: Arc<dyn AuthService>,
        book_service: Arc<dyn BookService>,
    ) -> Self {
        Self {
            otp_service,
            registration_service,
            auth_service,
            book_service,
        }
    }

    /// Wire every service on top of the given ports.
    pub fn from_parts<U>(
        uow: Arc<U>,
        sessions: Arc<dyn SessionStore>,
        mailer: Arc<dyn Mailer>,
        events: Arc<dyn EventSink>,
        config: Config,
    ) -> Self
    where
        U: UnitOfWork + 'static,
    {
        let auth_service: Arc<dyn AuthService> =
            Arc::new(Authenticator::new(uow.clone(), sessions, config));

        Self {
            otp_service: Arc::new(OtpIssuer::new(uow.clone(), mailer)),
            registration_service: Arc::new(Registrar::new(
                uow.clone(),
                auth_service.clone(),
                events,
            )),
            auth_service,
            book_service: Arc::new(Catalog::new(uow)),
        }
    }

    /// Create service container from live database, Redis and mail connections
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        cache: Cache,
        mailer: Arc<dyn Mailer>,
        config: Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let sessions = Arc::new(RedisSessionStore::new(cache));
        let events = Arc::new(WelcomeMailSink::new(mailer.clone(), config.app_name.clone()));

        Self::from_parts(uow, sessions, mailer, events, config)
    }
}

impl ServiceContainer for Services {
    fn otp(&self) -> Arc<dyn OtpService> {
        self.otp_service.clone()
    }

    fn registration(&self) -> Arc<dyn RegistrationService> {
        self.registration_service.clone()
    }

    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn books(&self) -> Arc<dyn BookService> {
        self.book_service.clone()
    }
}
