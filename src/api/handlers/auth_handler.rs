//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::cookies;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::REDIRECT_AFTER_LOGIN;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// User login request
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "The email field must be a valid email address."))]
    #[schema(example = "user@example.com")]
    #[serde(default)]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "The password field is required."))]
    #[schema(example = "SecurePass123!")]
    #[serde(default)]
    pub password: String,
    /// Keep the session for 30 days instead of 2 hours
    #[serde(default)]
    pub remember: bool,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("remember", &self.remember)
            .finish()
    }
}

/// Successful login. The session cookie is set alongside.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub user: UserResponse,
    #[schema(example = "/books")]
    pub redirect: String,
    /// JWT for API clients
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Create authentication routes (nested under /auth)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 422, description = "Invalid credentials or validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let outcome = state
        .auth_service
        .login(
            cookies::guest(&jar),
            payload.email,
            payload.password,
            payload.remember,
        )
        .await?;

    let jar = cookies::with_session(jar, &outcome.session, state.session_cookie_secure);

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: outcome.user,
            redirect: REDIRECT_AFTER_LOGIN.to_string(),
            access_token: outcome.token.access_token,
            token_type: outcome.token.token_type,
            expires_in: outcome.token.expires_in,
        }),
    ))
}

/// End the browser session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    if let Some(session_id) = cookies::session_id(&jar) {
        state.auth_service.logout(&session_id).await?;
    }

    Ok((
        cookies::without_session(jar),
        Json(MessageResponse::new("Logged out.")),
    ))
}
