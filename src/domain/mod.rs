//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod book;
pub mod caller;
pub mod events;
pub mod otp;
pub mod password;
pub mod user;

pub use book::{Book, BookDraft};
pub use caller::{CurrentUser, Guest};
pub use events::DomainEvent;
pub use otp::OtpRecord;
pub use password::Password;
pub use user::{normalize_email, NewUser, ProfileUpdate, Registration, User, UserResponse};
