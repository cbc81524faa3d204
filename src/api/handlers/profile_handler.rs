//! Profile handlers for the authenticated caller.

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Extension, Router,
};

use crate::api::extractors::JsonBody;
use crate::api::AppState;
use crate::domain::{CurrentUser, ProfileUpdate};
use crate::errors::AppResult;
use crate::types::UserEnvelope;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_current_user))
        .route("/update-profile", put(update_profile))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/user",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
) -> AppResult<Json<UserEnvelope>> {
    let user = state.auth_service.current_profile(&caller).await?;
    Ok(Json(UserEnvelope { user }))
}

/// Update the caller's profile
///
/// Only `name` can be changed; other fields in the body are ignored.
#[utoipa::path(
    put,
    path = "/user/update-profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = UserEnvelope),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> AppResult<Json<UserEnvelope>> {
    let user = state.auth_service.update_profile(&caller, update).await?;
    Ok(Json(UserEnvelope { user }))
}
