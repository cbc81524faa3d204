//! Registration handler.

use axum::{extract::State, response::Json, routing::post, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::cookies;
use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::config::{REDIRECT_AFTER_REGISTER, REDIRECT_TO_LOGIN};
use crate::domain::{Registration, UserResponse};
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "Registration successful.")]
    pub message: String,
    pub user: UserResponse,
    /// Whether a session was opened (only for OTP-confirmed addresses)
    pub authenticated: bool,
    #[schema(example = "/dashboard")]
    pub redirect: String,
}

pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// Create an account
///
/// Addresses verified via OTP in the last 10 minutes are confirmed and signed
/// in immediately; all others must log in.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = Registration,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 422, description = "Validation error or email taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(form): JsonBody<Registration>,
) -> AppResult<(CookieJar, Json<RegisterResponse>)> {
    let outcome = state
        .registration_service
        .register(cookies::guest(&jar), form)
        .await?;

    let (jar, response) = match outcome.session {
        Some(session) => (
            cookies::with_session(jar, &session, state.session_cookie_secure),
            RegisterResponse {
                message: "Registration successful.".to_string(),
                user: UserResponse::from(outcome.user),
                authenticated: true,
                redirect: REDIRECT_AFTER_REGISTER.to_string(),
            },
        ),
        None => (
            jar,
            RegisterResponse {
                message: "Registration successful! Please login with your credentials."
                    .to_string(),
                user: UserResponse::from(outcome.user),
                authenticated: false,
                redirect: REDIRECT_TO_LOGIN.to_string(),
            },
        ),
    };

    Ok((jar, Json(response)))
}
