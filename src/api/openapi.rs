//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, book_handler, otp_handler, profile_handler, registration_handler,
};
use crate::domain::{Book, BookDraft, ProfileUpdate, Registration, UserResponse};
use crate::types::{MessageResponse, UserEnvelope};

/// OpenAPI documentation for the Book Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Book Catalog API",
        version = "0.1.0",
        description = "Book catalog with email OTP-gated registration",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        otp_handler::send_otp,
        otp_handler::verify_otp,
        auth_handler::login,
        auth_handler::logout,
        registration_handler::register,
        // Profile endpoints
        profile_handler::get_current_user,
        profile_handler::update_profile,
        // Book endpoints
        book_handler::list_books,
        book_handler::create_book,
        book_handler::get_book,
        book_handler::update_book,
        book_handler::delete_book,
    ),
    components(
        schemas(
            // Domain types
            Book,
            BookDraft,
            ProfileUpdate,
            Registration,
            UserResponse,
            // Request / response types
            otp_handler::SendOtpRequest,
            otp_handler::SendOtpResponse,
            otp_handler::VerifyOtpRequest,
            otp_handler::VerifyOtpResponse,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            registration_handler::RegisterResponse,
            MessageResponse,
            UserEnvelope,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "OTP verification, registration, login"),
        (name = "Profile", description = "The caller's own account"),
        (name = "Books", description = "Shared book catalog")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
