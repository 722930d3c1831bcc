use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::NewComment;

/// Flat row as it comes back from the comments/users join, input to the tree
/// builder.
#[derive(sqlx::FromRow, Debug)]
pub struct CommentRecord {
    pub id: i64,
    pub review_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub like_count: i32,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_display_name: Option<String>,
    pub author_avatar_url: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CommentAuthor {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Materialized reply-tree node. Built on read, never stored.
#[derive(Serialize, Debug)]
pub struct CommentNode {
    pub id: i64,
    pub review_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub like_count: i32,
    pub liked_by_current_user: bool,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: CommentAuthor,
    pub replies: Vec<CommentNode>,
}

impl From<CommentRecord> for CommentNode {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            review_id: record.review_id,
            parent_id: record.parent_id,
            content: record.content,
            like_count: record.like_count,
            liked_by_current_user: false,
            is_edited: record.is_edited,
            created_at: record.created_at,
            updated_at: record.updated_at,
            author: CommentAuthor {
                id: record.author_id,
                display_name: record
                    .author_display_name
                    .unwrap_or_else(|| record.author_username.clone()),
                username: record.author_username,
                avatar_url: record.author_avatar_url,
            },
            replies: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateCommentPayload {
    pub review_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
}

impl TryFrom<CreateCommentPayload> for NewComment {
    type Error = String;

    fn try_from(value: CreateCommentPayload) -> Result<Self, Self::Error> {
        NewComment::new(value.review_id, value.parent_id, value.content)
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdateCommentPayload {
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct ToggleCommentLikeResponse {
    pub comment_id: i64,
    pub like_count: i32,
    pub liked: bool,
}

/// Row for the "comments this user liked" listing; `liked_at` carries the
/// sort key for its cursor.
#[derive(sqlx::FromRow, Debug)]
pub struct LikedCommentRecord {
    pub id: i64,
    pub review_id: i64,
    pub content: String,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub liked_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_display_name: Option<String>,
    pub author_avatar_url: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct LikedCommentSummary {
    pub id: i64,
    pub review_id: i64,
    pub content: String,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub author: CommentAuthor,
}

impl From<LikedCommentRecord> for LikedCommentSummary {
    fn from(record: LikedCommentRecord) -> Self {
        Self {
            id: record.id,
            review_id: record.review_id,
            content: record.content,
            like_count: record.like_count,
            created_at: record.created_at,
            author: CommentAuthor {
                id: record.author_id,
                display_name: record
                    .author_display_name
                    .unwrap_or_else(|| record.author_username.clone()),
                username: record.author_username,
                avatar_url: record.author_avatar_url,
            },
        }
    }
}
