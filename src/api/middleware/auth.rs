//! Authentication middleware.
//!
//! API clients authenticate with a bearer JWT; browsers with the session
//! cookie. A present `Authorization` header wins and is never silently
//! ignored, so a bad token fails even if a valid cookie is also sent.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::cookies;
use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::CurrentUser;
use crate::errors::AppError;

/// Resolve the caller and inject a [`CurrentUser`] into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|h| h.to_str().map_err(|_| AppError::Unauthorized))
        .transpose()?;

    let current_user = match auth_header {
        Some(header) => {
            let token = header
                .strip_prefix(BEARER_TOKEN_PREFIX)
                .ok_or(AppError::Unauthorized)?;
            let claims = state.auth_service.verify_token(token)?;
            CurrentUser {
                id: claims.sub,
                email: claims.email,
            }
        }
        None => {
            let session_id = cookies::session_id(&jar).ok_or(AppError::Unauthorized)?;
            state
                .auth_service
                .resolve_session(&session_id)
                .await?
                .ok_or(AppError::Unauthorized)?
        }
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
