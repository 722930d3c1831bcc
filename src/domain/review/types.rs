use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CarSummary, NewReview, ReviewContent, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "media_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Deserialize, Debug)]
pub struct ReviewMediaPayload {
    pub url: String,
    pub media_type: MediaType,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Deserialize, Debug)]
pub struct CreateReviewPayload {
    pub car_id: i64,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub pros: Option<String>,
    pub cons: Option<String>,
    #[serde(default)]
    pub media: Vec<ReviewMediaPayload>,
}

impl TryFrom<CreateReviewPayload> for NewReview {
    type Error = String;

    fn try_from(value: CreateReviewPayload) -> Result<Self, Self::Error> {
        NewReview::new(
            value.car_id,
            value.title,
            value.content,
            value.rating,
            value.pros,
            value.cons,
            value
                .media
                .into_iter()
                .map(|item| (item.url, item.media_type, item.alt_text, item.position))
                .collect(),
        )
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdateReviewStatusPayload {
    pub status: ReviewStatus,
}

/// Listing row from the reviews/users/cars join. `content` rides along so
/// the excerpt is computed at the edge instead of in SQL.
#[derive(sqlx::FromRow, Debug)]
pub struct ReviewSummaryRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub status: ReviewStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_display_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub car_id: i64,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
    pub car_generation: Option<String>,
}

impl ReviewSummaryRecord {
    /// Feed sort key; drafts fall back to their creation time.
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

/// Liked/bookmarked listing row; `saved_at` is the like/bookmark time and
/// carries the sort key for the cursor.
#[derive(sqlx::FromRow, Debug)]
pub struct SavedReviewRecord {
    #[sqlx(flatten)]
    pub review: ReviewSummaryRecord,
    pub saved_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct ReviewStats {
    pub view_count: i32,
    pub like_count: i32,
    pub comment_count: i32,
}

#[derive(Serialize, Debug)]
pub struct ReviewSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub rating: i32,
    pub status: ReviewStatus,
    pub published_at: DateTime<Utc>,
    pub author: UserSummary,
    pub car: CarSummary,
    pub stats: ReviewStats,
    pub liked_by_current_user: bool,
}

impl ReviewSummary {
    pub fn from_record(record: ReviewSummaryRecord, liked_review_ids: &HashSet<i64>) -> Self {
        Self {
            id: record.id,
            excerpt: ReviewContent::excerpt_of(&record.content),
            title: record.title,
            rating: record.rating,
            status: record.status,
            published_at: record.published_at.unwrap_or(record.created_at),
            author: UserSummary {
                id: record.author_id,
                display_name: record
                    .author_display_name
                    .unwrap_or_else(|| record.author_username.clone()),
                username: record.author_username,
                avatar_url: record.author_avatar_url,
            },
            car: CarSummary {
                id: record.car_id,
                make: record.car_make,
                model: record.car_model,
                year: record.car_year,
                generation: record.car_generation,
            },
            stats: ReviewStats {
                view_count: record.view_count,
                like_count: record.like_count,
                comment_count: record.comment_count,
            },
            liked_by_current_user: liked_review_ids.contains(&record.id),
        }
    }
}

/// Detail row: the summary columns plus the long-form fields.
#[derive(sqlx::FromRow, Debug)]
pub struct ReviewDetailRecord {
    #[sqlx(flatten)]
    pub summary: ReviewSummaryRecord,
    pub pros: Option<String>,
    pub cons: Option<String>,
}

#[derive(sqlx::FromRow, Serialize, Debug)]
pub struct ReviewMediaRecord {
    pub id: i64,
    pub url: String,
    pub media_type: MediaType,
    pub alt_text: Option<String>,
    pub position: i32,
}

#[derive(Serialize, Debug)]
pub struct ReviewDetail {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub rating: i32,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub status: ReviewStatus,
    pub published_at: DateTime<Utc>,
    pub author: UserSummary,
    pub car: CarSummary,
    pub stats: ReviewStats,
    pub liked_by_current_user: bool,
    pub bookmarked_by_current_user: bool,
    pub media: Vec<ReviewMediaRecord>,
}

#[derive(Serialize, Debug)]
pub struct CreateReviewResponse {
    pub review_id: i64,
}

#[derive(Serialize, Debug)]
pub struct ReviewStatusResponse {
    pub id: i64,
    pub status: ReviewStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct ToggleReviewLikeResponse {
    pub review_id: i64,
    pub like_count: i32,
    pub liked: bool,
}

#[derive(Serialize, Debug)]
pub struct ToggleBookmarkResponse {
    pub review_id: i64,
    pub bookmarked: bool,
}
