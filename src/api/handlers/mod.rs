//! HTTP request handlers.

pub mod auth_handler;
pub mod book_handler;
pub mod otp_handler;
pub mod profile_handler;
pub mod registration_handler;

pub use auth_handler::auth_routes;
pub use book_handler::book_routes;
pub use otp_handler::otp_routes;
pub use profile_handler::profile_routes;
pub use registration_handler::registration_routes;
