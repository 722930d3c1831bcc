use std::collections::HashSet;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::Span;
use uuid::Uuid;

use crate::{
    domain::{
        Cursor, NewReview, Page, PageLimit, ReviewDetail, ReviewDetailRecord, ReviewMediaRecord,
        ReviewStats, ReviewStatus, ReviewStatusResponse, ReviewSummary, ReviewSummaryRecord,
        SavedReviewRecord, ToggleBookmarkResponse, ToggleReviewLikeResponse, UserSummary,
    },
    routes::ReviewError,
};

pub(crate) const REVIEW_SUMMARY_COLUMNS: &str = r#"
    r.id, r.title, r.content, r.rating, r.status, r.published_at, r.created_at,
    r.view_count, r.like_count, r.comment_count,
    u.id AS author_id, u.username AS author_username,
    u.display_name AS author_display_name, u.avatar_url AS author_avatar_url,
    c.id AS car_id, c.make AS car_make, c.model AS car_model,
    c.year AS car_year, c.generation AS car_generation
"#;

pub(crate) const REVIEW_SUMMARY_FROM: &str = r#"
    FROM reviews r
    INNER JOIN users u ON u.id = r.author_id
    INNER JOIN cars c ON c.id = r.car_id
"#;

/// Which of the given reviews the user has liked, for response annotation.
#[tracing::instrument(skip(pool, review_ids))]
pub(crate) async fn liked_review_ids(
    user_id: Uuid,
    review_ids: &[i64],
    pool: &PgPool,
) -> Result<HashSet<i64>, anyhow::Error> {
    if review_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let rows: Vec<(i64,)> = sqlx::query_as(
        r#"
        SELECT review_id
        FROM review_likes
        WHERE user_id = $1
        AND review_id = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(review_ids)
    .fetch_all(pool)
    .await
    .context("Failed to load like annotations")?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

// Annotation runs on the trimmed page, after the probe row is gone.
pub(crate) async fn summarize_page(
    page: Page<ReviewSummaryRecord>,
    current_user: Option<Uuid>,
    pool: &PgPool,
) -> Result<Page<ReviewSummary>, anyhow::Error> {
    let liked = match current_user {
        Some(user_id) => {
            let ids: Vec<i64> = page.items.iter().map(|record| record.id).collect();
            liked_review_ids(user_id, &ids, pool).await?
        }
        None => HashSet::new(),
    };

    Ok(page.map(|record| ReviewSummary::from_record(record, &liked)))
}

#[tracing::instrument(skip_all, fields(review_id=tracing::field::Empty))]
pub async fn insert_review(
    author_id: Uuid,
    review: &NewReview,
    pool: &PgPool,
) -> Result<i64, anyhow::Error> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let (review_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO reviews (author_id, car_id, title, content, rating, pros, cons, status, published_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'published', now())
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(review.car_id)
    .bind(review.title.as_ref())
    .bind(review.content.as_ref())
    .bind(review.rating.value())
    .bind(review.pros.as_deref())
    .bind(review.cons.as_deref())
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to insert new review")?;

    insert_review_media(review_id, review, &mut transaction).await?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store a new review")?;

    Span::current().record("review_id", tracing::field::display(review_id));
    Ok(review_id)
}

async fn insert_review_media(
    review_id: i64,
    review: &NewReview,
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<(), anyhow::Error> {
    for media in &review.media {
        sqlx::query(
            r#"
            INSERT INTO review_media (review_id, url, media_type, alt_text, position)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(review_id)
        .bind(media.url.as_str())
        .bind(media.media_type)
        .bind(media.alt_text.as_deref())
        .bind(media.position)
        .execute(&mut **transaction)
        .await
        .context("Failed to insert review media")?;
    }

    Ok(())
}

/// Published review with its media, view counter bumped in the same
/// transaction as the read.
#[tracing::instrument(skip(pool))]
pub async fn get_published_review(
    id: i64,
    current_user: Option<Uuid>,
    pool: &PgPool,
) -> Result<ReviewDetail, ReviewError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let sql = format!(
        "SELECT {REVIEW_SUMMARY_COLUMNS}, r.pros, r.cons {REVIEW_SUMMARY_FROM} WHERE r.id = $1"
    );
    let record = sqlx::query_as::<_, ReviewDetailRecord>(&sql)
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await
        .context("Failed to fetch review")?
        .ok_or(ReviewError::NotFound)?;

    if record.summary.status != ReviewStatus::Published || record.summary.published_at.is_none() {
        return Err(ReviewError::NotFound);
    }

    let (view_count,): (i32,) = sqlx::query_as(
        r#"
        UPDATE reviews
        SET view_count = view_count + 1, updated_at = now()
        WHERE id = $1
        RETURNING view_count
        "#,
    )
    .bind(id)
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to increment view count")?;

    let media = sqlx::query_as::<_, ReviewMediaRecord>(
        r#"
        SELECT id, url, media_type, alt_text, position
        FROM review_media
        WHERE review_id = $1
        ORDER BY position ASC, id ASC
        "#,
    )
    .bind(id)
    .fetch_all(&mut *transaction)
    .await
    .context("Failed to fetch review media")?;

    let (liked, bookmarked) = match current_user {
        Some(user_id) => {
            let (liked,): (bool,) = sqlx::query_as(
                "SELECT EXISTS(SELECT 1 FROM review_likes WHERE review_id = $1 AND user_id = $2)",
            )
            .bind(id)
            .bind(user_id)
            .fetch_one(&mut *transaction)
            .await
            .context("Failed to check review like")?;

            let (bookmarked,): (bool,) = sqlx::query_as(
                "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE review_id = $1 AND user_id = $2)",
            )
            .bind(id)
            .bind(user_id)
            .fetch_one(&mut *transaction)
            .await
            .context("Failed to check review bookmark")?;

            (liked, bookmarked)
        }
        None => (false, false),
    };

    transaction
        .commit()
        .await
        .context("Failed to commit view-count transaction")?;

    let summary = record.summary;
    Ok(ReviewDetail {
        id: summary.id,
        excerpt: crate::domain::ReviewContent::excerpt_of(&summary.content),
        title: summary.title,
        content: summary.content,
        rating: summary.rating,
        pros: record.pros,
        cons: record.cons,
        status: summary.status,
        published_at: summary.published_at.unwrap_or(summary.created_at),
        author: UserSummary {
            id: summary.author_id,
            display_name: summary
                .author_display_name
                .unwrap_or_else(|| summary.author_username.clone()),
            username: summary.author_username,
            avatar_url: summary.author_avatar_url,
        },
        car: crate::domain::CarSummary {
            id: summary.car_id,
            make: summary.car_make,
            model: summary.car_model,
            year: summary.car_year,
            generation: summary.car_generation,
        },
        stats: ReviewStats {
            view_count,
            like_count: summary.like_count,
            comment_count: summary.comment_count,
        },
        liked_by_current_user: liked,
        bookmarked_by_current_user: bookmarked,
        media,
    })
}

// Author gate shared by the review mutation paths.
async fn check_review_author(
    review_id: i64,
    author_id: Uuid,
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<(ReviewStatus, Option<DateTime<Utc>>), ReviewError> {
    let row: Option<(Uuid, ReviewStatus, Option<DateTime<Utc>>)> =
        sqlx::query_as("SELECT author_id, status, published_at FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_optional(&mut **transaction)
            .await
            .context("Failed to look up review author")?;

    match row {
        None => Err(ReviewError::NotFound),
        Some((owner_id, _, _)) if owner_id != author_id => Err(ReviewError::Forbidden),
        Some((_, status, published_at)) => Ok((status, published_at)),
    }
}

#[tracing::instrument(skip(pool, review))]
pub async fn update_review(
    review_id: i64,
    author_id: Uuid,
    review: &NewReview,
    pool: &PgPool,
) -> Result<ReviewStatusResponse, ReviewError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    check_review_author(review_id, author_id, &mut transaction).await?;

    let (id, status, published_at, updated_at): (
        i64,
        ReviewStatus,
        Option<DateTime<Utc>>,
        DateTime<Utc>,
    ) = sqlx::query_as(
        r#"
        UPDATE reviews
        SET car_id = $1, title = $2, content = $3, rating = $4, pros = $5, cons = $6,
            updated_at = now()
        WHERE id = $7
        RETURNING id, status, published_at, updated_at
        "#,
    )
    .bind(review.car_id)
    .bind(review.title.as_ref())
    .bind(review.content.as_ref())
    .bind(review.rating.value())
    .bind(review.pros.as_deref())
    .bind(review.cons.as_deref())
    .bind(review_id)
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to update review")?;

    // The media set is replaced wholesale on every edit
    sqlx::query("DELETE FROM review_media WHERE review_id = $1")
        .bind(review_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to clear review media")?;

    insert_review_media(review_id, review, &mut transaction).await?;

    transaction
        .commit()
        .await
        .context("Failed to commit review update transaction")?;

    Ok(ReviewStatusResponse {
        id,
        status,
        published_at,
        updated_at,
    })
}

/// Status transition. First publish stamps `published_at`; moving away from
/// published clears it so the review drops out of the feeds.
#[tracing::instrument(skip(pool))]
pub async fn update_review_status(
    review_id: i64,
    author_id: Uuid,
    status: ReviewStatus,
    pool: &PgPool,
) -> Result<ReviewStatusResponse, ReviewError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let (_, current_published_at) =
        check_review_author(review_id, author_id, &mut transaction).await?;

    let next_published_at = match status {
        ReviewStatus::Published => current_published_at.or_else(|| Some(Utc::now())),
        _ => None,
    };

    let (id, status, published_at, updated_at): (
        i64,
        ReviewStatus,
        Option<DateTime<Utc>>,
        DateTime<Utc>,
    ) = sqlx::query_as(
        r#"
        UPDATE reviews
        SET status = $1, published_at = $2, updated_at = now()
        WHERE id = $3
        RETURNING id, status, published_at, updated_at
        "#,
    )
    .bind(status)
    .bind(next_published_at)
    .bind(review_id)
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to update review status")?;

    transaction
        .commit()
        .await
        .context("Failed to commit review status transaction")?;

    Ok(ReviewStatusResponse {
        id,
        status,
        published_at,
        updated_at,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn delete_review(
    review_id: i64,
    author_id: Uuid,
    pool: &PgPool,
) -> Result<(), ReviewError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    check_review_author(review_id, author_id, &mut transaction).await?;

    // Media, comments, likes and bookmarks go with it via FK cascade
    sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(review_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to delete review")?;

    transaction
        .commit()
        .await
        .context("Failed to commit review delete transaction")?;

    Ok(())
}

/// Like toggle: the join row and the denormalized counter move together in
/// one transaction, with the counter adjusted by an atomic SQL expression.
#[tracing::instrument(skip(pool))]
pub async fn toggle_review_like(
    review_id: i64,
    user_id: Uuid,
    pool: &PgPool,
) -> Result<ToggleReviewLikeResponse, ReviewError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let status: Option<(ReviewStatus,)> =
        sqlx::query_as("SELECT status FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_optional(&mut *transaction)
            .await
            .context("Failed to look up review")?;

    match status {
        Some((ReviewStatus::Published,)) => {}
        _ => return Err(ReviewError::NotFound),
    }

    let removed = sqlx::query(
        r#"
        DELETE FROM review_likes
        WHERE review_id = $1 AND user_id = $2
        "#,
    )
    .bind(review_id)
    .bind(user_id)
    .execute(&mut *transaction)
    .await
    .context("Failed to remove review like")?;

    let liked = removed.rows_affected() == 0;

    if liked {
        sqlx::query(
            r#"
            INSERT INTO review_likes (review_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(review_id)
        .bind(user_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to insert review like")?;
    }

    let adjustment = if liked { 1 } else { -1 };
    let (like_count,): (i32,) = sqlx::query_as(
        r#"
        UPDATE reviews
        SET like_count = like_count + $1, updated_at = now()
        WHERE id = $2
        RETURNING like_count
        "#,
    )
    .bind(adjustment)
    .bind(review_id)
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to adjust review like count")?;

    transaction
        .commit()
        .await
        .context("Failed to commit like toggle transaction")?;

    Ok(ToggleReviewLikeResponse {
        review_id,
        like_count,
        liked,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn toggle_bookmark(
    review_id: i64,
    user_id: Uuid,
    pool: &PgPool,
) -> Result<ToggleBookmarkResponse, ReviewError> {
    let status: Option<(ReviewStatus,)> =
        sqlx::query_as("SELECT status FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_optional(pool)
            .await
            .context("Failed to look up review")?;

    match status {
        Some((ReviewStatus::Published,)) => {}
        _ => return Err(ReviewError::NotFound),
    }

    let removed = sqlx::query(
        r#"
        DELETE FROM bookmarks
        WHERE review_id = $1 AND user_id = $2
        "#,
    )
    .bind(review_id)
    .bind(user_id)
    .execute(pool)
    .await
    .context("Failed to remove bookmark")?;

    let bookmarked = removed.rows_affected() == 0;

    if bookmarked {
        sqlx::query(
            r#"
            INSERT INTO bookmarks (review_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(review_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to insert bookmark")?;
    }

    Ok(ToggleBookmarkResponse {
        review_id,
        bookmarked,
    })
}

/// Reviews a user liked, newest like first, `(liked_at, id)` keyset.
#[tracing::instrument(skip(pool))]
pub async fn list_liked_reviews(
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, i64>>,
    current_user: Option<Uuid>,
    pool: &PgPool,
) -> Result<Page<ReviewSummary>, anyhow::Error> {
    let mut sql = format!(
        r#"
        SELECT {REVIEW_SUMMARY_COLUMNS}, rl.created_at AS saved_at
        {REVIEW_SUMMARY_FROM}
        INNER JOIN review_likes rl ON rl.review_id = r.id
        WHERE rl.user_id = $1 AND r.status = 'published'
        "#
    );
    if cursor.is_some() {
        sql.push_str(" AND (rl.created_at < $3 OR (rl.created_at = $3 AND r.id < $4))");
    }
    sql.push_str(" ORDER BY rl.created_at DESC, r.id DESC LIMIT $2");

    let page = fetch_saved_reviews(&sql, user_id, limit, cursor, pool)
        .await
        .context("Failed to list liked reviews")?;

    summarize_page(page, current_user, pool).await
}

/// Reviews a user bookmarked; only ever requested for the caller.
#[tracing::instrument(skip(pool))]
pub async fn list_bookmarked_reviews(
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, i64>>,
    pool: &PgPool,
) -> Result<Page<ReviewSummary>, anyhow::Error> {
    let mut sql = format!(
        r#"
        SELECT {REVIEW_SUMMARY_COLUMNS}, b.created_at AS saved_at
        {REVIEW_SUMMARY_FROM}
        INNER JOIN bookmarks b ON b.review_id = r.id
        WHERE b.user_id = $1 AND r.status = 'published'
        "#
    );
    if cursor.is_some() {
        sql.push_str(" AND (b.created_at < $3 OR (b.created_at = $3 AND r.id < $4))");
    }
    sql.push_str(" ORDER BY b.created_at DESC, r.id DESC LIMIT $2");

    let page = fetch_saved_reviews(&sql, user_id, limit, cursor, pool)
        .await
        .context("Failed to list bookmarked reviews")?;

    summarize_page(page, Some(user_id), pool).await
}

async fn fetch_saved_reviews(
    sql: &str,
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, i64>>,
    pool: &PgPool,
) -> Result<Page<ReviewSummaryRecord>, sqlx::Error> {
    let mut query_builder = sqlx::query_as::<_, SavedReviewRecord>(sql)
        .bind(user_id)
        .bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder.bind(cursor.sort_key).bind(cursor.tie_break);
    }

    let rows = query_builder.fetch_all(pool).await?;

    let page = Page::assemble(rows, limit, |row| Cursor::new(row.saved_at, row.review.id));
    Ok(page.map(|row| row.review))
}
