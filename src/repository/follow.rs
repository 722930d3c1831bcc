use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{Cursor, FollowerRecord, Page, PageLimit, UserSummary},
    routes::FollowError,
};

#[tracing::instrument(skip(pool))]
pub async fn count_followers(user_id: Uuid, pool: &PgPool) -> Result<i64, anyhow::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("Failed to count followers")?;

    Ok(count)
}

#[tracing::instrument(skip(pool))]
pub async fn count_following(user_id: Uuid, pool: &PgPool) -> Result<i64, anyhow::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .context("Failed to count followed users")?;

    Ok(count)
}

#[tracing::instrument(skip(pool))]
pub async fn is_following(
    follower_id: Uuid,
    target_user_id: Uuid,
    pool: &PgPool,
) -> Result<bool, anyhow::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1
            FROM follows
            WHERE follower_id = $1
            AND following_id = $2
        )
        "#,
    )
    .bind(follower_id)
    .bind(target_user_id)
    .fetch_one(pool)
    .await
    .context("Failed to check follow status")?;

    Ok(exists)
}

/// Toggle a follow edge. Returns whether the caller follows the target
/// afterwards.
#[tracing::instrument(skip(pool))]
pub async fn toggle_follow(
    follower_id: Uuid,
    target_user_id: Uuid,
    pool: &PgPool,
) -> Result<bool, FollowError> {
    let (target_exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(target_user_id)
            .fetch_one(pool)
            .await
            .context("Failed to check that the target user exists")?;

    if !target_exists {
        return Err(FollowError::NotFound);
    }

    let deleted = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1
        AND following_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(target_user_id)
    .execute(pool)
    .await
    .context("Failed to remove follow edge")?;

    if deleted.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO follows (follower_id, following_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(target_user_id)
    .execute(pool)
    .await
    .context("Failed to insert follow edge")?;

    Ok(true)
}

#[tracing::instrument(skip(pool))]
pub async fn list_followers(
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, Uuid>>,
    pool: &PgPool,
) -> Result<Page<UserSummary>, anyhow::Error> {
    list_follow_edge(user_id, limit, cursor, FollowSide::Followers, pool).await
}

#[tracing::instrument(skip(pool))]
pub async fn list_following(
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, Uuid>>,
    pool: &PgPool,
) -> Result<Page<UserSummary>, anyhow::Error> {
    list_follow_edge(user_id, limit, cursor, FollowSide::Following, pool).await
}

#[derive(Debug, Clone, Copy)]
enum FollowSide {
    Followers,
    Following,
}

// Both listings read the same edge table; only the joined column and the
// filter column swap sides.
async fn list_follow_edge(
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, Uuid>>,
    side: FollowSide,
    pool: &PgPool,
) -> Result<Page<UserSummary>, anyhow::Error> {
    let (join_column, filter_column) = match side {
        FollowSide::Followers => ("follower_id", "following_id"),
        FollowSide::Following => ("following_id", "follower_id"),
    };

    let mut sql = format!(
        r#"
        SELECT u.id, u.username, u.display_name, u.avatar_url, f.created_at AS followed_at
        FROM follows f
        INNER JOIN users u ON u.id = f.{join_column}
        WHERE f.{filter_column} = $1
        "#,
    );
    if cursor.is_some() {
        sql.push_str(" AND (f.created_at < $3 OR (f.created_at = $3 AND u.id < $4))");
    }
    sql.push_str(" ORDER BY f.created_at DESC, u.id DESC LIMIT $2");

    let mut query_builder = sqlx::query_as::<_, FollowerRecord>(&sql)
        .bind(user_id)
        .bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder.bind(cursor.sort_key).bind(cursor.tie_break);
    }

    let rows = query_builder
        .fetch_all(pool)
        .await
        .context("Failed to list follow edges")?;

    let page = Page::assemble(rows, limit, |row| Cursor::new(row.followed_at, row.id));

    Ok(page.map(UserSummary::from))
}
