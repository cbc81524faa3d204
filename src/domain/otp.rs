//! One-time password records.
//!
//! Two separate validity rules apply to a record:
//! - [`OtpRecord::accepts`] is the verification gate (code match + expiry).
//! - [`OtpRecord::is_fresh_at`] is the registration gate (verified + created
//!   within the freshness window), which ignores `expires_at` entirely.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::config::{OTP_CODE_LENGTH, OTP_CODE_SPACE, OTP_EXPIRY_MINUTES, OTP_FRESHNESS_MINUTES};

/// Generate a uniformly random numeric code, zero-padded to six digits.
pub fn generate_code() -> String {
    let value = rand::thread_rng().gen_range(0..OTP_CODE_SPACE);
    format!("{:0width$}", value, width = OTP_CODE_LENGTH)
}

/// Whether `code` has the shape of an issued code (exactly six ASCII digits).
pub fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Earliest creation time a verified record may have to count at `now`.
pub fn freshness_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::minutes(OTP_FRESHNESS_MINUTES)
}

/// Persisted OTP state for one email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    /// A fresh, unverified record for `email` with a newly generated code.
    pub fn issue(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::with_code(email, generate_code(), now)
    }

    /// Same as [`OtpRecord::issue`] with a caller-chosen code.
    pub fn with_code(email: impl Into<String>, code: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            code: code.into(),
            expires_at: now + Duration::minutes(OTP_EXPIRY_MINUTES),
            is_verified: false,
            created_at: now,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Verification gate: right email, right code, not yet expired.
    pub fn accepts(&self, email: &str, code: &str, now: DateTime<Utc>) -> bool {
        self.email == email && self.code == code && !self.is_expired_at(now)
    }

    /// Verified, and created at or after `since`.
    pub fn is_verified_since(&self, since: DateTime<Utc>) -> bool {
        self.is_verified && self.created_at >= since
    }

    /// Registration gate: verified and created within the freshness window.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.is_verified_since(freshness_cutoff(now))
    }
}
