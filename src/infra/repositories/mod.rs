//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod book_repository;
pub(crate) mod entities;
mod otp_repository;
mod user_repository;

pub use book_repository::{BookRepository, BookStore};
pub use otp_repository::{OtpRepository, OtpStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use user_repository::insert_user;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use book_repository::MockBookRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use otp_repository::MockOtpRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
