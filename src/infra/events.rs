//! Domain event sink.

use async_trait::async_trait;
use std::sync::Arc;

use super::mail::Mailer;
use crate::domain::DomainEvent;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Receives domain events after the state change they describe has been
/// committed. Emitting never fails the caller.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: DomainEvent);
}

/// Logs every event and greets new users by mail.
pub struct WelcomeMailSink {
    mailer: Arc<dyn Mailer>,
    app_name: String,
}

impl WelcomeMailSink {
    pub fn new(mailer: Arc<dyn Mailer>, app_name: impl Into<String>) -> Self {
        Self {
            mailer,
            app_name: app_name.into(),
        }
    }

    fn welcome_body(&self, name: &str, confirmed: bool) -> String {
        let next_step = if confirmed {
            "Your email address is confirmed and you are signed in."
        } else {
            "You can sign in with the password you chose."
        };
        format!(
            "Hello {},\n\nWelcome to {}! {}\n",
            name, self.app_name, next_step
        )
    }
}

#[async_trait]
impl EventSink for WelcomeMailSink {
    async fn emit(&self, event: DomainEvent) {
        match event {
            DomainEvent::UserRegistered {
                user_id,
                name,
                email,
                confirmed,
            } => {
                tracing::info!(user_id = %user_id, confirmed, "User registered");

                let subject = format!("Welcome to {}", self.app_name);
                let body = self.welcome_body(&name, confirmed);
                if let Err(e) = self.mailer.send_mail(&email, &subject, &body).await {
                    tracing::warn!(user_id = %user_id, error = %e, "Welcome mail failed");
                }
            }
        }
    }
}
