//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Redis-backed sessions
//! - Outbound mail
//! - Domain event delivery
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod events;
pub mod mail;
pub mod repositories;
pub mod sessions;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use events::{EventSink, WelcomeMailSink};
pub use mail::{build_mailer, LogMailer, MailConfig, MailError, Mailer, SmtpMailer};
pub use repositories::{
    BookRepository, BookStore, OtpRepository, OtpStore, UserRepository, UserStore,
};
pub use sessions::{RedisSessionStore, SessionData, SessionStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use events::MockEventSink;
#[cfg(any(test, feature = "test-utils"))]
pub use mail::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockBookRepository, MockOtpRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use sessions::MockSessionStore;
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
