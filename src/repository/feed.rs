use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Cursor, Page, PageLimit, ReviewSummary, ReviewSummaryRecord};
use crate::repository::review::{REVIEW_SUMMARY_COLUMNS, REVIEW_SUMMARY_FROM, summarize_page};

/// Newest published reviews, `(published_at, id)` descending keyset.
#[tracing::instrument(skip(pool))]
pub async fn latest_feed(
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, i64>>,
    current_user: Option<Uuid>,
    pool: &PgPool,
) -> Result<Page<ReviewSummary>, anyhow::Error> {
    let mut sql = format!(
        r#"
        SELECT {REVIEW_SUMMARY_COLUMNS}
        {REVIEW_SUMMARY_FROM}
        WHERE r.status = 'published' AND r.published_at IS NOT NULL
        "#
    );
    if cursor.is_some() {
        sql.push_str(" AND (r.published_at < $2 OR (r.published_at = $2 AND r.id < $3))");
    }
    sql.push_str(" ORDER BY r.published_at DESC, r.id DESC LIMIT $1");

    let mut query_builder =
        sqlx::query_as::<_, ReviewSummaryRecord>(&sql).bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder.bind(cursor.sort_key).bind(cursor.tie_break);
    }

    let rows = query_builder
        .fetch_all(pool)
        .await
        .context("Failed to fetch the latest feed")?;

    let page = Page::assemble(rows, limit, |row| {
        Cursor::new(row.sort_timestamp(), row.id)
    });

    summarize_page(page, current_user, pool).await
}

/// Most-liked published reviews, `(like_count, id)` descending keyset.
///
/// `like_count` is mutable, so a row whose count changes between two page
/// fetches can shift across a page boundary and be skipped or repeated.
/// Accepted: the feed is a popularity surface, not a ledger.
#[tracing::instrument(skip(pool))]
pub async fn trending_feed(
    limit: PageLimit,
    cursor: Option<Cursor<i32, i64>>,
    current_user: Option<Uuid>,
    pool: &PgPool,
) -> Result<Page<ReviewSummary>, anyhow::Error> {
    let mut sql = format!(
        r#"
        SELECT {REVIEW_SUMMARY_COLUMNS}
        {REVIEW_SUMMARY_FROM}
        WHERE r.status = 'published' AND r.published_at IS NOT NULL
        "#
    );
    if cursor.is_some() {
        sql.push_str(" AND (r.like_count < $2 OR (r.like_count = $2 AND r.id < $3))");
    }
    sql.push_str(" ORDER BY r.like_count DESC, r.id DESC LIMIT $1");

    let mut query_builder =
        sqlx::query_as::<_, ReviewSummaryRecord>(&sql).bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder.bind(cursor.sort_key).bind(cursor.tie_break);
    }

    let rows = query_builder
        .fetch_all(pool)
        .await
        .context("Failed to fetch the trending feed")?;

    let page = Page::assemble(rows, limit, |row| Cursor::new(row.like_count, row.id));

    summarize_page(page, current_user, pool).await
}

/// Published reviews authored by people the caller follows.
#[tracing::instrument(skip(pool))]
pub async fn personalized_feed(
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, i64>>,
    pool: &PgPool,
) -> Result<Page<ReviewSummary>, anyhow::Error> {
    let mut sql = format!(
        r#"
        SELECT {REVIEW_SUMMARY_COLUMNS}
        {REVIEW_SUMMARY_FROM}
        INNER JOIN follows f ON f.following_id = r.author_id
        WHERE f.follower_id = $1 AND r.status = 'published' AND r.published_at IS NOT NULL
        "#
    );
    if cursor.is_some() {
        sql.push_str(" AND (r.published_at < $3 OR (r.published_at = $3 AND r.id < $4))");
    }
    sql.push_str(" ORDER BY r.published_at DESC, r.id DESC LIMIT $2");

    let mut query_builder = sqlx::query_as::<_, ReviewSummaryRecord>(&sql)
        .bind(user_id)
        .bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder.bind(cursor.sort_key).bind(cursor.tie_break);
    }

    let rows = query_builder
        .fetch_all(pool)
        .await
        .context("Failed to fetch the personalized feed")?;

    let page = Page::assemble(rows, limit, |row| {
        Cursor::new(row.sort_timestamp(), row.id)
    });

    summarize_page(page, Some(user_id), pool).await
}
