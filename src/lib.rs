//! Book Catalog - book CRUD API with email OTP-gated registration.
//!
//! Guests request a six-digit code by email, verify it, and register. An
//! address verified within the last ten minutes yields a confirmed account
//! that is signed in immediately; any other registration yields an
//! unconfirmed account. Authenticated callers manage a shared book catalog.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, Redis, mail, events)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Book, BookDraft, CurrentUser, Guest, OtpRecord, Password, User};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
