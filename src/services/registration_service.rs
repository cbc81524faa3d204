//! Registration service - account creation gated by email OTP.
//!
//! A guest who verified a code for the address within the freshness window
//! gets a confirmed account and is signed in straight away. Everyone else
//! gets an unconfirmed account and is sent to the login page. Missing OTP
//! proof never blocks registration.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use super::auth_service::{AuthService, Session};
use crate::domain::otp::freshness_cutoff;
use crate::domain::{normalize_email, DomainEvent, Guest, NewUser, Password, Registration, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{EventSink, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub user: User,
    /// Present only for confirmed accounts
    pub session: Option<Session>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn register(&self, guest: Guest, form: Registration) -> AppResult<RegistrationOutcome>;
}

pub struct Registrar<U: UnitOfWork> {
    uow: Arc<U>,
    auth: Arc<dyn AuthService>,
    events: Arc<dyn EventSink>,
}

impl<U: UnitOfWork> Registrar<U> {
    pub fn new(uow: Arc<U>, auth: Arc<dyn AuthService>, events: Arc<dyn EventSink>) -> Self {
        Self { uow, auth, events }
    }
}

#[async_trait]
impl<U: UnitOfWork> RegistrationService for Registrar<U> {
    async fn register(&self, guest: Guest, form: Registration) -> AppResult<RegistrationOutcome> {
        form.validate()?;

        let email = normalize_email(&form.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let now = Utc::now();
        let proof = self
            .uow
            .otps()
            .find_verified_since(&email, freshness_cutoff(now))
            .await?
            .filter(|record| record.is_fresh_at(now));

        let password_hash = Password::new(&form.password)?.into_string();
        let new_user = NewUser {
            name: form.name.trim().to_string(),
            email,
            password_hash,
            email_verified_at: proof.as_ref().map(|_| now),
        };

        let user = self
            .uow
            .create_user(new_user, proof.map(|record| record.id))
            .await?;

        tracing::info!(
            user_id = %user.id,
            confirmed = user.is_confirmed(),
            "Account created"
        );

        self.events
            .emit(DomainEvent::UserRegistered {
                user_id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                confirmed: user.is_confirmed(),
            })
            .await;

        // The account is committed at this point; a session failure only
        // means the new user has to log in by hand.
        let session = if user.is_confirmed() {
            match self
                .auth
                .start_session(&user, false, guest.session_id)
                .await
            {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(
                        user_id = %user.id,
                        error = %e,
                        "Could not open session after registration"
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(RegistrationOutcome { user, session })
    }
}
