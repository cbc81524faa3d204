//! Authentication service - credentials, sessions and bearer tokens.
//!
//! DDD: Uses domain Password value object for hashing.
//! DDD: Uses Unit of Work for repository access.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    Config, REMEMBER_SESSION_LIFETIME_SECONDS, SECONDS_PER_HOUR, SESSION_LIFETIME_SECONDS,
    TOKEN_TYPE_BEARER,
};
use crate::domain::{normalize_email, CurrentUser, Guest, Password, ProfileUpdate, User, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{SessionData, SessionStore, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// An established browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub lifetime_secs: u64,
    /// Whether the client should keep the session across browser restarts
    pub remember: bool,
}

/// Everything a successful login hands back to the client.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserResponse,
    pub session: Session,
    pub token: TokenResponse,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and open a new session, discarding the guest's old one.
    async fn login(
        &self,
        guest: Guest,
        email: String,
        password: String,
        remember: bool,
    ) -> AppResult<LoginOutcome>;

    /// Open a session for `user`. `previous` is destroyed first.
    async fn start_session(
        &self,
        user: &User,
        remember: bool,
        previous: Option<String>,
    ) -> AppResult<Session>;

    /// Caller behind a session identifier, if the session is still alive.
    async fn resolve_session(&self, session_id: &str) -> AppResult<Option<CurrentUser>>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    async fn logout(&self, session_id: &str) -> AppResult<()>;

    async fn current_profile(&self, caller: &CurrentUser) -> AppResult<UserResponse>;

    /// Apply an allow-listed partial update to the caller's own profile.
    async fn update_profile(
        &self,
        caller: &CurrentUser,
        update: ProfileUpdate,
    ) -> AppResult<UserResponse>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn session_lifetime(remember: bool) -> u64 {
    if remember {
        REMEMBER_SESSION_LIFETIME_SECONDS
    } else {
        SESSION_LIFETIME_SECONDS
    }
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    sessions: Arc<dyn SessionStore>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, sessions: Arc<dyn SessionStore>, config: Config) -> Self {
        Self {
            uow,
            sessions,
            config,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(
        &self,
        guest: Guest,
        email: String,
        password: String,
        remember: bool,
    ) -> AppResult<LoginOutcome> {
        let email = normalize_email(&email);

        // Unknown addresses still pay for one Argon2 verification so that
        // response timing does not reveal which accounts exist.
        let user = match self.uow.users().find_by_email(&email).await? {
            Some(user) => user,
            None => {
                Password::verify_dummy(&password);
                tracing::info!(email = %email, "Login failed");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            tracing::info!(email = %email, "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        let session = self
            .start_session(&user, remember, guest.session_id)
            .await?;
        let token = generate_token(&user, &self.config)?;

        tracing::info!(user_id = %user.id, remember, "User logged in");

        Ok(LoginOutcome {
            user: UserResponse::from(user),
            session,
            token,
        })
    }

    async fn start_session(
        &self,
        user: &User,
        remember: bool,
        previous: Option<String>,
    ) -> AppResult<Session> {
        if let Some(previous) = previous {
            self.sessions.destroy(&previous).await?;
        }

        let lifetime_secs = session_lifetime(remember);
        let data = SessionData {
            user_id: user.id,
            email: user.email.clone(),
            remember,
            created_at: Utc::now(),
        };
        let id = self.sessions.create(data, lifetime_secs).await?;

        Ok(Session {
            id,
            lifetime_secs,
            remember,
        })
    }

    async fn resolve_session(&self, session_id: &str) -> AppResult<Option<CurrentUser>> {
        let caller = self
            .sessions
            .find(session_id)
            .await?
            .map(|data| CurrentUser {
                id: data.user_id,
                email: data.email,
            });
        Ok(caller)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn logout(&self, session_id: &str) -> AppResult<()> {
        self.sessions.destroy(session_id).await
    }

    async fn current_profile(&self, caller: &CurrentUser) -> AppResult<UserResponse> {
        let user = self
            .uow
            .users()
            .find_by_id(caller.id)
            .await?
            .ok_or_not_found()?;
        Ok(UserResponse::from(user))
    }

    async fn update_profile(
        &self,
        caller: &CurrentUser,
        update: ProfileUpdate,
    ) -> AppResult<UserResponse> {
        update.validate()?;

        let user = match update.name {
            Some(name) => {
                let user = self
                    .uow
                    .users()
                    .update_name(caller.id, name.trim().to_string())
                    .await?;
                tracing::info!(user_id = %caller.id, "Profile updated");
                user
            }
            None => self
                .uow
                .users()
                .find_by_id(caller.id)
                .await?
                .ok_or_not_found()?,
        };

        Ok(UserResponse::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockBookRepository, MockOtpRepository, MockSessionStore, MockUserRepository};
    use crate::services::testing::{mocked_uow, test_config, unconfirmed_user, TEST_PASSWORD};
    use mockall::predicate::eq;

    fn authenticator(
        users: MockUserRepository,
        sessions: MockSessionStore,
    ) -> Authenticator<crate::infra::MockUnitOfWork> {
        let uow = mocked_uow(users, MockOtpRepository::new(), MockBookRepository::new(), |_| {});
        Authenticator::new(uow, Arc::new(sessions), test_config())
    }

    fn caller(user: &User) -> CurrentUser {
        CurrentUser {
            id: user.id,
            email: user.email.clone(),
        }
    }

    #[tokio::test]
    async fn test_login_rotates_previous_session() {
        let user = unconfirmed_user("a@x.com");
        let mut users = MockUserRepository::new();
        let found = user.clone();
        users
            .expect_find_by_email()
            .with(eq("a@x.com"))
            .returning(move |_| Ok(Some(found.clone())));

        let mut sessions = MockSessionStore::new();
        sessions
            .expect_destroy()
            .with(eq("old-session"))
            .times(1)
            .returning(|_| Ok(()));
        sessions
            .expect_create()
            .withf(|data, lifetime| !data.remember && *lifetime == SESSION_LIFETIME_SECONDS)
            .times(1)
            .returning(|_, _| Ok("new-session".to_string()));

        let auth = authenticator(users, sessions);
        let outcome = auth
            .login(
                Guest::new(Some("old-session".to_string())),
                "A@x.com".to_string(),
                TEST_PASSWORD.to_string(),
                false,
            )
            .await
            .unwrap();

        assert_eq!(outcome.session.id, "new-session");
        assert_eq!(outcome.user.id, user.id);
        assert_eq!(outcome.token.token_type, "Bearer");

        let claims = auth.verify_token(&outcome.token.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_remember_extends_session_lifetime() {
        let user = unconfirmed_user("a@x.com");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let mut sessions = MockSessionStore::new();
        sessions
            .expect_create()
            .withf(|data, lifetime| data.remember && *lifetime == REMEMBER_SESSION_LIFETIME_SECONDS)
            .returning(|_, _| Ok("s".to_string()));

        let auth = authenticator(users, sessions);
        let outcome = auth
            .login(Guest::default(), "a@x.com".into(), TEST_PASSWORD.into(), true)
            .await
            .unwrap();

        assert_eq!(outcome.session.lifetime_secs, REMEMBER_SESSION_LIFETIME_SECONDS);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_fail_alike() {
        let user = unconfirmed_user("a@x.com");
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |email| {
            Ok((email == "a@x.com").then(|| user.clone()))
        });

        let mut sessions = MockSessionStore::new();
        sessions.expect_create().never();
        sessions.expect_destroy().never();

        let auth = authenticator(users, sessions);

        let wrong = auth
            .login(Guest::default(), "a@x.com".into(), "wrong-password".into(), false)
            .await
            .unwrap_err();
        let unknown = auth
            .login(Guest::default(), "b@x.com".into(), TEST_PASSWORD.into(), false)
            .await
            .unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_resolve_session() {
        let user_id = Uuid::new_v4();
        let mut sessions = MockSessionStore::new();
        sessions.expect_find().returning(move |id| {
            Ok((id == "live").then(|| SessionData {
                user_id,
                email: "a@x.com".to_string(),
                remember: false,
                created_at: Utc::now(),
            }))
        });

        let auth = authenticator(MockUserRepository::new(), sessions);

        let caller = auth.resolve_session("live").await.unwrap().unwrap();
        assert_eq!(caller.id, user_id);
        assert!(auth.resolve_session("gone").await.unwrap().is_none());
    }

    #[test]
    fn test_verify_token_rejects_garbage() {
        let auth = authenticator(MockUserRepository::new(), MockSessionStore::new());
        assert!(matches!(auth.verify_token("not.a.jwt"), Err(AppError::Jwt(_))));
    }

    #[tokio::test]
    async fn test_update_profile_changes_name_only() {
        let user = unconfirmed_user("a@x.com");
        let me = caller(&user);
        let mut users = MockUserRepository::new();
        users
            .expect_update_name()
            .with(eq(user.id), eq("New Name".to_string()))
            .times(1)
            .returning(move |_, name| {
                let mut updated = user.clone();
                updated.name = name;
                Ok(updated)
            });

        let auth = authenticator(users, MockSessionStore::new());
        let profile = auth
            .update_profile(&me, ProfileUpdate { name: Some(" New Name ".to_string()) })
            .await
            .unwrap();

        assert_eq!(profile.name, "New Name");
    }

    #[tokio::test]
    async fn test_update_profile_rejects_blank_name() {
        let user = unconfirmed_user("a@x.com");
        let mut users = MockUserRepository::new();
        users.expect_update_name().never();

        let auth = authenticator(users, MockSessionStore::new());
        let err = auth
            .update_profile(&caller(&user), ProfileUpdate { name: Some("  ".to_string()) })
            .await
            .unwrap_err();

        assert!(err.is_validation_on("name"));
    }
}
