use anyhow::Context;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    Cursor, Page, PageLimit, ProfileRecord, UserEmail, UserName, UserSearchRecord, UserSummary,
};

#[tracing::instrument(skip_all, fields(username=%username))]
pub async fn get_stored_credentials(
    username: &str,
    pool: &PgPool,
) -> Result<Option<(Uuid, Secret<String>)>, anyhow::Error> {
    let row: Option<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT id, password_hash
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to retrieve stored credentials")?;

    Ok(row.map(|(id, hash)| (id, Secret::new(hash))))
}

#[tracing::instrument(skip(password_hash, pool))]
pub async fn update_password_hash(
    user_id: Uuid,
    password_hash: Secret<String>,
    pool: &PgPool,
) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1, updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(password_hash.expose_secret())
    .bind(user_id)
    .execute(pool)
    .await
    .context("Failed to update password hash")?;

    Ok(())
}

#[tracing::instrument(skip(pool))]
pub async fn get_username_by_id(user_id: Uuid, pool: &PgPool) -> Result<String, anyhow::Error> {
    let (username,): (String,) = sqlx::query_as(
        r#"
        SELECT username
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .context("Failed to fetch username for user id")?;

    Ok(username)
}

#[tracing::instrument(skip(pool))]
pub async fn email_exists(email: &str, pool: &PgPool) -> Result<bool, anyhow::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
            .context("Failed to check email uniqueness")?;

    Ok(exists)
}

#[tracing::instrument(skip(pool))]
pub async fn username_exists(username: &str, pool: &PgPool) -> Result<bool, anyhow::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
            .context("Failed to check username uniqueness")?;

    Ok(exists)
}

#[tracing::instrument(skip_all, fields(username=%username))]
pub async fn insert_user(
    username: &UserName,
    email: &UserEmail,
    display_name: Option<&str>,
    password_hash: Secret<String>,
    pool: &PgPool,
) -> Result<(Uuid, DateTime<Utc>), anyhow::Error> {
    let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, display_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username.as_ref())
    .bind(email.as_ref())
    .bind(password_hash.expose_secret())
    .bind(display_name)
    .fetch_one(pool)
    .await
    .context("Failed to insert new user")?;

    Ok((id, created_at))
}

#[tracing::instrument(skip(pool))]
pub async fn get_profile_by_username(
    username: &str,
    pool: &PgPool,
) -> Result<Option<ProfileRecord>, anyhow::Error> {
    sqlx::query_as::<_, ProfileRecord>(
        r#"
        SELECT id, username, display_name, bio, avatar_url, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch user profile")
}

/// Username search: ascending `(username, id)` keyset scan so results read
/// alphabetically and a page boundary never repeats a row.
#[tracing::instrument(skip(pool))]
pub async fn search_users(
    query: &str,
    limit: PageLimit,
    cursor: Option<Cursor<String, Uuid>>,
    pool: &PgPool,
) -> Result<Page<UserSummary>, anyhow::Error> {
    let pattern = format!(
        "%{}%",
        query
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    );

    let mut sql = String::from(
        r#"
        SELECT id, username, display_name, avatar_url
        FROM users
        WHERE username ILIKE $1
        "#,
    );
    if cursor.is_some() {
        sql.push_str(" AND (username > $3 OR (username = $3 AND id > $4))");
    }
    sql.push_str(" ORDER BY username ASC, id ASC LIMIT $2");

    let mut query_builder = sqlx::query_as::<_, UserSearchRecord>(&sql)
        .bind(pattern)
        .bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder
            .bind(cursor.sort_key.clone())
            .bind(cursor.tie_break);
    }

    let rows = query_builder
        .fetch_all(pool)
        .await
        .context("Failed to search users")?;

    let page = Page::assemble(rows, limit, |row| {
        Cursor::new(row.username.clone(), row.id)
    });

    Ok(page.map(UserSummary::from))
}
