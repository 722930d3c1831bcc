use std::collections::HashSet;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::Span;
use uuid::Uuid;

use crate::{
    domain::{
        CommentNode, CommentRecord, Cursor, LikedCommentRecord, LikedCommentSummary, NewComment,
        Page, PageLimit, ToggleCommentLikeResponse, apply_likes, build_comment_tree,
        collect_subtree_ids,
    },
    routes::CommentError,
};

const COMMENT_ROW_SELECT: &str = r#"
    SELECT cm.id, cm.review_id, cm.parent_id, cm.content, cm.like_count,
           cm.is_edited, cm.created_at, cm.updated_at,
           u.id AS author_id, u.username AS author_username,
           u.display_name AS author_display_name, u.avatar_url AS author_avatar_url
    FROM comments cm
    INNER JOIN users u ON u.id = cm.author_id
"#;

/// The whole thread in one query, materialized into a reply forest. Rows
/// come back oldest-first so siblings read in posting order.
#[tracing::instrument(skip(pool))]
pub async fn get_comments_for_review(
    review_id: i64,
    current_user: Option<Uuid>,
    pool: &PgPool,
) -> Result<Vec<CommentNode>, anyhow::Error> {
    let sql =
        format!("{COMMENT_ROW_SELECT} WHERE cm.review_id = $1 ORDER BY cm.created_at ASC, cm.id ASC");

    let rows = sqlx::query_as::<_, CommentRecord>(&sql)
        .bind(review_id)
        .fetch_all(pool)
        .await
        .context("Failed to load comments for review")?;

    let comment_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut tree = build_comment_tree(rows);

    if let Some(user_id) = current_user {
        if !comment_ids.is_empty() {
            let liked = liked_comment_ids(user_id, &comment_ids, pool).await?;
            apply_likes(&mut tree, &liked);
        }
    }

    Ok(tree)
}

async fn liked_comment_ids(
    user_id: Uuid,
    comment_ids: &[i64],
    pool: &PgPool,
) -> Result<HashSet<i64>, anyhow::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        r#"
        SELECT comment_id
        FROM comment_likes
        WHERE user_id = $1
        AND comment_id = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(comment_ids)
    .fetch_all(pool)
    .await
    .context("Failed to load comment like annotations")?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Insert a comment and bump the review's counter in one transaction. A
/// reply's parent must exist and belong to the same review.
#[tracing::instrument(skip_all, fields(review_id=%comment.review_id, comment_id=tracing::field::Empty))]
pub async fn insert_comment(
    comment: &NewComment,
    author_id: Uuid,
    pool: &PgPool,
) -> Result<CommentNode, CommentError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let (review_exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM reviews WHERE id = $1)")
            .bind(comment.review_id)
            .fetch_one(&mut *transaction)
            .await
            .context("Failed to check that the review exists")?;

    if !review_exists {
        return Err(CommentError::NotFound);
    }

    if let Some(parent_id) = comment.parent_id {
        let parent: Option<(i64,)> =
            sqlx::query_as("SELECT review_id FROM comments WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(&mut *transaction)
                .await
                .context("Failed to look up parent comment")?;

        match parent {
            Some((parent_review_id,)) if parent_review_id == comment.review_id => {}
            _ => return Err(CommentError::InvalidParent),
        }
    }

    let (comment_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO comments (review_id, author_id, parent_id, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(comment.review_id)
    .bind(author_id)
    .bind(comment.parent_id)
    .bind(comment.text.as_ref())
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to insert comment")?;

    sqlx::query(
        r#"
        UPDATE reviews
        SET comment_count = comment_count + 1, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(comment.review_id)
    .execute(&mut *transaction)
    .await
    .context("Failed to increment review comment count")?;

    let node = fetch_comment_node(comment_id, &mut transaction).await?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store a new comment")?;

    Span::current().record("comment_id", tracing::field::display(comment_id));
    Ok(node)
}

async fn fetch_comment_node(
    comment_id: i64,
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<CommentNode, anyhow::Error> {
    let sql = format!("{COMMENT_ROW_SELECT} WHERE cm.id = $1");

    let record = sqlx::query_as::<_, CommentRecord>(&sql)
        .bind(comment_id)
        .fetch_one(&mut **transaction)
        .await
        .context("Failed to fetch stored comment")?;

    Ok(CommentNode::from(record))
}

// Author gate shared by the comment mutation paths. A comment reached
// through the wrong review is NotFound, not Forbidden.
async fn check_comment_author(
    comment_id: i64,
    review_id: i64,
    author_id: Uuid,
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<(), CommentError> {
    let row: Option<(i64, Uuid)> =
        sqlx::query_as("SELECT review_id, author_id FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&mut **transaction)
            .await
            .context("Failed to look up comment")?;

    match row {
        None => Err(CommentError::NotFound),
        Some((found_review_id, _)) if found_review_id != review_id => Err(CommentError::NotFound),
        Some((_, owner_id)) if owner_id != author_id => Err(CommentError::Forbidden),
        Some(_) => Ok(()),
    }
}

#[tracing::instrument(skip(pool, content))]
pub async fn update_comment(
    comment_id: i64,
    review_id: i64,
    author_id: Uuid,
    content: &str,
    pool: &PgPool,
) -> Result<CommentNode, CommentError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    check_comment_author(comment_id, review_id, author_id, &mut transaction).await?;

    sqlx::query(
        r#"
        UPDATE comments
        SET content = $1, is_edited = true, updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(content)
    .bind(comment_id)
    .execute(&mut *transaction)
    .await
    .context("Failed to update comment")?;

    let node = fetch_comment_node(comment_id, &mut transaction).await?;

    transaction
        .commit()
        .await
        .context("Failed to commit comment update transaction")?;

    Ok(node)
}

/// Delete a comment and its whole reply subtree. The closure is computed
/// from the review's adjacency rows, every collected row is removed in one
/// set operation, and the review's counter drops by the same amount, all
/// inside a single transaction.
#[tracing::instrument(skip(pool))]
pub async fn delete_comment_tree(
    comment_id: i64,
    review_id: i64,
    author_id: Uuid,
    pool: &PgPool,
) -> Result<u64, CommentError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    check_comment_author(comment_id, review_id, author_id, &mut transaction).await?;

    let adjacency: Vec<(i64, Option<i64>)> =
        sqlx::query_as("SELECT id, parent_id FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_all(&mut *transaction)
            .await
            .context("Failed to load the review's comment adjacency rows")?;

    let ids_to_delete = collect_subtree_ids(comment_id, &adjacency);

    let deleted = sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
        .bind(&ids_to_delete)
        .execute(&mut *transaction)
        .await
        .context("Failed to delete comment subtree")?;

    sqlx::query(
        r#"
        UPDATE reviews
        SET comment_count = comment_count - $1, updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(ids_to_delete.len() as i64)
    .bind(review_id)
    .execute(&mut *transaction)
    .await
    .context("Failed to decrement review comment count")?;

    transaction
        .commit()
        .await
        .context("Failed to commit comment delete transaction")?;

    Ok(deleted.rows_affected())
}

#[tracing::instrument(skip(pool))]
pub async fn toggle_comment_like(
    comment_id: i64,
    review_id: i64,
    user_id: Uuid,
    pool: &PgPool,
) -> Result<ToggleCommentLikeResponse, CommentError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let row: Option<(i64,)> = sqlx::query_as("SELECT review_id FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(&mut *transaction)
        .await
        .context("Failed to look up comment")?;

    match row {
        Some((found_review_id,)) if found_review_id == review_id => {}
        _ => return Err(CommentError::NotFound),
    }

    let removed = sqlx::query(
        r#"
        DELETE FROM comment_likes
        WHERE comment_id = $1 AND user_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(user_id)
    .execute(&mut *transaction)
    .await
    .context("Failed to remove comment like")?;

    let liked = removed.rows_affected() == 0;

    if liked {
        sqlx::query(
            r#"
            INSERT INTO comment_likes (comment_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to insert comment like")?;
    }

    let adjustment = if liked { 1 } else { -1 };
    let (like_count,): (i32,) = sqlx::query_as(
        r#"
        UPDATE comments
        SET like_count = like_count + $1, updated_at = now()
        WHERE id = $2
        RETURNING like_count
        "#,
    )
    .bind(adjustment)
    .bind(comment_id)
    .fetch_one(&mut *transaction)
    .await
    .context("Failed to adjust comment like count")?;

    transaction
        .commit()
        .await
        .context("Failed to commit comment like transaction")?;

    Ok(ToggleCommentLikeResponse {
        comment_id,
        like_count,
        liked,
    })
}

/// Comments a user liked, newest like first, `(liked_at, id)` keyset.
#[tracing::instrument(skip(pool))]
pub async fn list_liked_comments(
    user_id: Uuid,
    limit: PageLimit,
    cursor: Option<Cursor<DateTime<Utc>, i64>>,
    pool: &PgPool,
) -> Result<Page<LikedCommentSummary>, anyhow::Error> {
    let mut sql = String::from(
        r#"
        SELECT cm.id, cm.review_id, cm.content, cm.like_count, cm.created_at,
               cl.created_at AS liked_at,
               u.id AS author_id, u.username AS author_username,
               u.display_name AS author_display_name, u.avatar_url AS author_avatar_url
        FROM comment_likes cl
        INNER JOIN comments cm ON cm.id = cl.comment_id
        INNER JOIN users u ON u.id = cm.author_id
        WHERE cl.user_id = $1
        "#,
    );
    if cursor.is_some() {
        sql.push_str(" AND (cl.created_at < $3 OR (cl.created_at = $3 AND cm.id < $4))");
    }
    sql.push_str(" ORDER BY cl.created_at DESC, cm.id DESC LIMIT $2");

    let mut query_builder = sqlx::query_as::<_, LikedCommentRecord>(&sql)
        .bind(user_id)
        .bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder.bind(cursor.sort_key).bind(cursor.tie_break);
    }

    let rows = query_builder
        .fetch_all(pool)
        .await
        .context("Failed to list liked comments")?;

    let page = Page::assemble(rows, limit, |row| Cursor::new(row.liked_at, row.id));

    Ok(page.map(LikedCommentSummary::from))
}
