use chrono::{DateTime, Utc};
use serde::Serialize;

/// Catalog entry projection shared by car listings, review cards and the
/// garage.
#[derive(Serialize, Debug)]
pub struct CarSummary {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub generation: Option<String>,
}

#[derive(sqlx::FromRow, Serialize, Debug)]
pub struct CarRecord {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub generation: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CarSearchQuery(String);

impl CarSearchQuery {
    /// Free-text catalog filter; `%` and `_` are escaped so user input
    /// cannot act as LIKE wildcards.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.len() > 100 {
            return Err("Invalid search query: cannot exceed 100 characters.".to_string());
        }

        let escaped = trimmed
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");

        Ok(Self(escaped))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn like_pattern(&self) -> String {
        format!("%{}%", self.0)
    }
}
