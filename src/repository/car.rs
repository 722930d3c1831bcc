use anyhow::Context;
use sqlx::PgPool;

use crate::domain::{CarRecord, CarSearchQuery, Cursor, Page, PageLimit};

/// Catalog listing: newest entries first, plain `(id)` keyset (the id is
/// both sort key and tie-break).
#[tracing::instrument(skip(pool))]
pub async fn list_cars(
    query: Option<&CarSearchQuery>,
    limit: PageLimit,
    cursor: Option<Cursor<i64, i64>>,
    pool: &PgPool,
) -> Result<Page<CarRecord>, anyhow::Error> {
    let search = query.filter(|q| !q.is_empty());

    let mut sql = String::from(
        r#"
        SELECT id, make, model, year, generation, image_url, created_at
        FROM cars
        WHERE ($1 = '' OR make ILIKE $1 OR model ILIKE $1 OR COALESCE(generation, '') ILIKE $1)
        "#,
    );
    if cursor.is_some() {
        sql.push_str(" AND id < $3");
    }
    sql.push_str(" ORDER BY id DESC LIMIT $2");

    let mut query_builder = sqlx::query_as::<_, CarRecord>(&sql)
        .bind(search.map(CarSearchQuery::like_pattern).unwrap_or_default())
        .bind(limit.fetch_size());

    if let Some(cursor) = &cursor {
        query_builder = query_builder.bind(cursor.tie_break);
    }

    let rows = query_builder
        .fetch_all(pool)
        .await
        .context("Failed to list cars")?;

    Ok(Page::assemble(rows, limit, |row| Cursor::new(row.id, row.id)))
}

#[tracing::instrument(skip(pool))]
pub async fn get_car(id: i64, pool: &PgPool) -> Result<Option<CarRecord>, anyhow::Error> {
    sqlx::query_as::<_, CarRecord>(
        r#"
        SELECT id, make, model, year, generation, image_url, created_at
        FROM cars
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch car")
}

#[tracing::instrument(skip(pool))]
pub async fn car_exists(id: i64, pool: &PgPool) -> Result<bool, anyhow::Error> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
        .context("Failed to check that the car exists")?;

    Ok(exists)
}
