//! OTP repository.
//!
//! The table holds at most one row per email. Issuing a code overwrites that
//! row in a single statement, so concurrent requests for the same address
//! cannot leave two live codes behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Insert, QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::otp::{self, ActiveModel, Entity as OtpEntity};
use crate::domain::OtpRecord;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Store `record` as the only record for its email, replacing any previous one.
    async fn replace_for_email(&self, record: OtpRecord) -> AppResult<()>;

    /// Most recent record matching email and code that has not expired at `now`.
    async fn find_active(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<OtpRecord>>;

    /// Most recent verified record for email created at or after `since`.
    async fn find_verified_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Option<OtpRecord>>;

    /// Flag a record as verified. Idempotent.
    async fn mark_verified(&self, id: Uuid) -> AppResult<()>;
}

/// `INSERT ... ON CONFLICT (email) DO UPDATE` carrying every field of `record`.
fn upsert_for_email(record: OtpRecord) -> Insert<ActiveModel> {
    let active_model = ActiveModel {
        id: Set(record.id),
        email: Set(record.email),
        otp_code: Set(record.code),
        expires_at: Set(record.expires_at),
        is_verified: Set(record.is_verified),
        created_at: Set(record.created_at),
        updated_at: Set(record.created_at),
    };

    OtpEntity::insert(active_model).on_conflict(
        OnConflict::column(otp::Column::Email)
            .update_columns([
                otp::Column::Id,
                otp::Column::OtpCode,
                otp::Column::ExpiresAt,
                otp::Column::IsVerified,
                otp::Column::CreatedAt,
                otp::Column::UpdatedAt,
            ])
            .to_owned(),
    )
}

fn active_query(email: &str, code: &str, now: DateTime<Utc>) -> Select<OtpEntity> {
    OtpEntity::find()
        .filter(otp::Column::Email.eq(email))
        .filter(otp::Column::OtpCode.eq(code))
        .filter(otp::Column::ExpiresAt.gt(now))
        .order_by_desc(otp::Column::CreatedAt)
}

// Freshness only; expires_at does not apply
fn verified_since_query(email: &str, since: DateTime<Utc>) -> Select<OtpEntity> {
    OtpEntity::find()
        .filter(otp::Column::Email.eq(email))
        .filter(otp::Column::IsVerified.eq(true))
        .filter(otp::Column::CreatedAt.gte(since))
        .order_by_desc(otp::Column::CreatedAt)
}

pub struct OtpStore {
    db: DatabaseConnection,
}

impl OtpStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OtpRepository for OtpStore {
    async fn replace_for_email(&self, record: OtpRecord) -> AppResult<()> {
        upsert_for_email(record)
            .exec_without_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn find_active(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<OtpRecord>> {
        let result = active_query(email, code, now)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(OtpRecord::from))
    }

    async fn find_verified_since(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> AppResult<Option<OtpRecord>> {
        let result = verified_since_query(email, since)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(OtpRecord::from))
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<()> {
        let result = OtpEntity::update_many()
            .col_expr(otp::Column::IsVerified, Expr::value(true))
            .col_expr(otp::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(otp::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
