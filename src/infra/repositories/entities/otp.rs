//! OTP database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::OtpRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "otps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// One row per address; a new request overwrites the previous one
    #[sea_orm(unique)]
    pub email: String,
    pub otp_code: String,
    pub expires_at: DateTimeUtc,
    pub is_verified: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for OtpRecord {
    fn from(model: Model) -> Self {
        OtpRecord {
            id: model.id,
            email: model.email,
            code: model.otp_code,
            expires_at: model.expires_at,
            is_verified: model.is_verified,
            created_at: model.created_at,
        }
    }
}
