//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod auth_service;
mod book_service;
pub mod container;
mod otp_service;
mod registration_service;

#[cfg(test)]
pub(crate) mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{
    AuthService, Authenticator, Claims, LoginOutcome, Session, TokenResponse,
};
pub use book_service::{BookService, Catalog};
pub use otp_service::{IssuedOtp, OtpIssuer, OtpService};
pub use registration_service::{Registrar, RegistrationOutcome, RegistrationService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use book_service::MockBookService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use otp_service::MockOtpService;
#[cfg(any(test, feature = "test-utils"))]
pub use registration_service::MockRegistrationService;
