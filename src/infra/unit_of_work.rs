//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories and owns the one workflow that
//! must touch two tables atomically: creating a user while consuming the
//! OTP record that proved the address.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, EntityTrait, IsolationLevel,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::otp::Entity as OtpEntity;
use super::repositories::{
    insert_user, BookRepository, BookStore, OtpRepository, OtpStore, UserRepository, UserStore,
};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Unit of Work trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get OTP repository
    fn otps(&self) -> Arc<dyn OtpRepository>;

    /// Get book repository
    fn books(&self) -> Arc<dyn BookRepository>;

    /// Insert a user and, when `consumed_otp` is given, delete that OTP
    /// record in the same transaction.
    ///
    /// Fails with `EmailTaken` if the address is already in use.
    async fn create_user(&self, new_user: NewUser, consumed_otp: Option<Uuid>) -> AppResult<User>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    otp_repo: Arc<OtpStore>,
    book_repo: Arc<BookStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let otp_repo = Arc::new(OtpStore::new(db.clone()));
        let book_repo = Arc::new(BookStore::new(db.clone()));
        Self {
            db,
            user_repo,
            otp_repo,
            book_repo,
        }
    }

    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)
    }

    /// Commit on success, roll back on error.
    async fn finish<T>(txn: DatabaseTransaction, outcome: AppResult<T>) -> AppResult<T> {
        match outcome {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

async fn create_user_in(
    txn: &DatabaseTransaction,
    new_user: NewUser,
    consumed_otp: Option<Uuid>,
) -> AppResult<User> {
    let user = insert_user(txn, new_user).await?;

    if let Some(otp_id) = consumed_otp {
        OtpEntity::delete_by_id(otp_id)
            .exec(txn)
            .await
            .map_err(AppError::from)?;
    }

    Ok(user)
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn otps(&self) -> Arc<dyn OtpRepository> {
        self.otp_repo.clone()
    }

    fn books(&self) -> Arc<dyn BookRepository> {
        self.book_repo.clone()
    }

    async fn create_user(&self, new_user: NewUser, consumed_otp: Option<Uuid>) -> AppResult<User> {
        let txn = self.begin().await?;
        let outcome = create_user_in(&txn, new_user, consumed_otp).await;
        Self::finish(txn, outcome).await
    }
}
