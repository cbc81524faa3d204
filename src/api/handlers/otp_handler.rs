//! OTP handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;

/// Request a verification code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendOtpRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    #[schema(example = "jane@example.com")]
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendOtpResponse {
    #[schema(example = "OTP has been sent to your email.")]
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// Submit a received code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    #[schema(example = "jane@example.com")]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1, message = "The otp code field is required."))]
    #[schema(example = "042137")]
    #[serde(default)]
    pub otp_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyOtpResponse {
    pub verified: bool,
    #[schema(example = "OTP verified successfully.")]
    pub message: String,
}

/// Create OTP routes (nested under /auth)
pub fn otp_routes() -> Router<AppState> {
    Router::new()
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
}

/// Email a one-time code, replacing any earlier code for the address
#[utoipa::path(
    post,
    path = "/auth/send-otp",
    tag = "Authentication",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = SendOtpResponse),
        (status = 422, description = "Invalid email or already registered"),
        (status = 500, description = "Mail could not be delivered")
    )
)]
pub async fn send_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SendOtpRequest>,
) -> AppResult<Json<SendOtpResponse>> {
    let issued = state.otp_service.request_code(&payload.email).await?;

    Ok(Json(SendOtpResponse {
        message: "OTP has been sent to your email.".to_string(),
        expires_at: issued.expires_at,
    }))
}

/// Verify a code previously sent to the address
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    tag = "Authentication",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code verified", body = VerifyOtpResponse),
        (status = 401, description = "Invalid or expired code"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyOtpRequest>,
) -> AppResult<Json<VerifyOtpResponse>> {
    state
        .otp_service
        .verify_code(&payload.email, &payload.otp_code)
        .await?;

    Ok(Json(VerifyOtpResponse {
        verified: true,
        message: "OTP verified successfully.".to_string(),
    }))
}
