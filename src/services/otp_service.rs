//! OTP service - issues and verifies email one-time codes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{OTP_EXPIRY_MINUTES, OTP_MAIL_SUBJECT};
use crate::domain::otp::is_well_formed;
use crate::domain::{normalize_email, OtpRecord};
use crate::errors::{AppError, AppResult};
use crate::infra::{Mailer, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Result of issuing a code.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedOtp {
    /// Normalized address the code was sent to
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// After this instant the code is no longer accepted
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OtpService: Send + Sync {
    /// Issue a fresh code for `email`, superseding any previous one, and mail it.
    async fn request_code(&self, email: &str) -> AppResult<IssuedOtp>;

    /// Mark the matching unexpired code as verified.
    async fn verify_code(&self, email: &str, code: &str) -> AppResult<()>;
}

pub struct OtpIssuer<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
}

impl<U: UnitOfWork> OtpIssuer<U> {
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>) -> Self {
        Self { uow, mailer }
    }
}

fn otp_mail_body(code: &str) -> String {
    format!(
        "Your OTP code is: {}\n\nIt expires in {} minutes.",
        code, OTP_EXPIRY_MINUTES
    )
}

#[async_trait]
impl<U: UnitOfWork> OtpService for OtpIssuer<U> {
    async fn request_code(&self, email: &str) -> AppResult<IssuedOtp> {
        let email = normalize_email(email);

        if let Some(user) = self.uow.users().find_by_email(&email).await? {
            if user.is_confirmed() {
                return Err(AppError::AlreadyRegistered);
            }
        }

        let record = OtpRecord::issue(email.clone(), Utc::now());
        let issued = IssuedOtp {
            email: email.clone(),
            expires_at: record.expires_at,
        };
        let body = otp_mail_body(&record.code);

        self.uow.otps().replace_for_email(record).await?;

        // The record stays in place on failure; the guest may simply ask again
        if let Err(e) = self.mailer.send_mail(&email, OTP_MAIL_SUBJECT, &body).await {
            tracing::error!(email = %email, error = %e, "Failed to deliver OTP mail");
            return Err(AppError::DeliveryFailed);
        }

        tracing::info!(email = %email, expires_at = %issued.expires_at, "OTP issued");
        Ok(issued)
    }

    async fn verify_code(&self, email: &str, code: &str) -> AppResult<()> {
        let email = normalize_email(email);
        let code = code.trim();

        if !is_well_formed(code) {
            return Err(AppError::InvalidOrExpiredOtp);
        }

        let record = self
            .uow
            .otps()
            .find_active(&email, code, Utc::now())
            .await?
            .ok_or(AppError::InvalidOrExpiredOtp)?;

        // A concurrent request may have replaced the record since the lookup
        self.uow
            .otps()
            .mark_verified(record.id)
            .await
            .map_err(|e| match e {
                AppError::NotFound => AppError::InvalidOrExpiredOtp,
                other => other,
            })?;

        tracing::info!(email = %email, "OTP verified");
        Ok(())
    }
}
