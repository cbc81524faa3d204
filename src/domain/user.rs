//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::config::{MAX_STRING_LENGTH, MIN_PASSWORD_LENGTH};
use crate::errors::{AppResult, FieldErrors};

/// Canonical form of an email address: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Set when the address was proven via OTP at registration (None = unconfirmed)
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the account's email address has been confirmed.
    pub fn is_confirmed(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

/// Data needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub email_verified_at: Option<DateTime<Utc>>,
}

/// Registration form as submitted by a guest.
#[derive(Clone, Deserialize, ToSchema)]
pub struct Registration {
    /// Display name
    #[schema(example = "Jane Reader")]
    #[serde(default)]
    pub name: String,
    /// Email address, must be unique
    #[schema(example = "jane@example.com")]
    #[serde(default)]
    pub email: String,
    /// Password (minimum 8 characters)
    #[schema(example = "SecurePass123!", min_length = 8)]
    #[serde(default)]
    pub password: String,
    /// Must equal `password`
    #[schema(example = "SecurePass123!")]
    #[serde(default)]
    pub password_confirmation: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Registration {
    /// Check every field and collect all problems at once.
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();
        let max = MAX_STRING_LENGTH as usize;

        if self.name.trim().is_empty() {
            errors.add("name", "The name field is required.");
        } else if self.name.chars().count() > max {
            errors.add(
                "name",
                format!("The name field must not be greater than {} characters.", max),
            );
        }

        let email = normalize_email(&self.email);
        if email.is_empty() {
            errors.add("email", "The email field is required.");
        } else if !email.validate_email() {
            errors.add("email", "The email field must be a valid email address.");
        } else if email.chars().count() > max {
            errors.add(
                "email",
                format!("The email field must not be greater than {} characters.", max),
            );
        }

        if self.password.chars().count() < MIN_PASSWORD_LENGTH as usize {
            errors.add(
                "password",
                format!(
                    "The password field must be at least {} characters.",
                    MIN_PASSWORD_LENGTH
                ),
            );
        } else if self.password != self.password_confirmation {
            errors.add("password", "The password field confirmation does not match.");
        }

        errors.into_result()
    }
}

/// Allow-listed profile changes. Anything not named here cannot be updated
/// through the profile endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    /// New display name
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                errors.add("name", "The name field is required.");
            } else if name.chars().count() > MAX_STRING_LENGTH as usize {
                errors.add(
                    "name",
                    format!(
                        "The name field must not be greater than {} characters.",
                        MAX_STRING_LENGTH
                    ),
                );
            }
        }

        errors.into_result()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Display name
    #[schema(example = "Jane Reader")]
    pub name: String,
    /// Email address
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// When the email address was confirmed, if ever
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
        }
    }
}
