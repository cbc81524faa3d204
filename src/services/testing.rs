//! Fixtures shared by the service unit tests.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User};
use crate::infra::{
    BookRepository, MockBookRepository, MockOtpRepository, MockUnitOfWork, MockUserRepository,
    OtpRepository, UserRepository,
};

pub const TEST_PASSWORD: &str = "SecurePass123!";

pub fn test_config() -> Config {
    Config::with_jwt_secret("a-test-secret-that-is-long-enough-for-hs256")
}

pub fn unconfirmed_user(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: "Jane Reader".to_string(),
        email: email.to_string(),
        password_hash: Password::new(TEST_PASSWORD)
            .expect("hash test password")
            .into_string(),
        email_verified_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn confirmed_user(email: &str) -> User {
    User {
        email_verified_at: Some(Utc::now()),
        ..unconfirmed_user(email)
    }
}

/// A mock unit of work handing out the given repository mocks. The
/// `create_user` expectation is left to the caller via `configure`.
pub fn mocked_uow(
    users: MockUserRepository,
    otps: MockOtpRepository,
    books: MockBookRepository,
    configure: impl FnOnce(&mut MockUnitOfWork),
) -> Arc<MockUnitOfWork> {
    let users: Arc<dyn UserRepository> = Arc::new(users);
    let otps: Arc<dyn OtpRepository> = Arc::new(otps);
    let books: Arc<dyn BookRepository> = Arc::new(books);

    let mut uow = MockUnitOfWork::new();
    uow.expect_users().returning(move || users.clone());
    uow.expect_otps().returning(move || otps.clone());
    uow.expect_books().returning(move || books.clone());
    configure(&mut uow);
    Arc::new(uow)
}
