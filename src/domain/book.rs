//! Book domain entity and input validation.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_STRING_LENGTH, MIN_BOOK_YEAR};
use crate::errors::{AppResult, FieldErrors};

/// Book domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Unique book identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "The Left Hand of Darkness")]
    pub title: String,
    #[schema(example = "Ursula K. Le Guin")]
    pub author: String,
    pub description: Option<String>,
    #[schema(example = 1969)]
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submitted book fields, used for both create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct BookDraft {
    /// Required, at most 255 characters
    #[schema(example = "The Left Hand of Darkness")]
    #[serde(default)]
    pub title: String,
    /// Required, at most 255 characters
    #[schema(example = "Ursula K. Le Guin")]
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Between 1000 and the current year
    #[serde(default)]
    #[schema(example = 1969)]
    pub year: Option<i32>,
}

impl BookDraft {
    /// Validate against the current calendar year.
    pub fn validate(&self) -> AppResult<()> {
        self.validate_in_year(Utc::now().year())
    }

    /// Validate with an explicit upper bound for `year`.
    pub fn validate_in_year(&self, current_year: i32) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        check_required_text(&mut errors, "title", &self.title);
        check_required_text(&mut errors, "author", &self.author);

        if let Some(year) = self.year {
            if year < MIN_BOOK_YEAR {
                errors.add(
                    "year",
                    format!("The year field must be at least {}.", MIN_BOOK_YEAR),
                );
            } else if year > current_year {
                errors.add(
                    "year",
                    format!("The year field must not be greater than {}.", current_year),
                );
            }
        }

        errors.into_result()
    }
}

fn check_required_text(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {} field is required.", field));
    } else if value.chars().count() > MAX_STRING_LENGTH as usize {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {} characters.",
                field, MAX_STRING_LENGTH
            ),
        );
    }
}
