use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::{GarageCarDetails, GarageCarRecord, NewGarageCar},
    routes::GarageError,
};

const GARAGE_CAR_SELECT: &str = r#"
    SELECT g.id, g.nickname, g.purchase_date, g.mileage, g.modifications,
           g.image_url, g.is_active, g.created_at,
           c.id AS car_id, c.make AS car_make, c.model AS car_model,
           c.year AS car_year, c.generation AS car_generation
    FROM garage_cars g
    INNER JOIN cars c ON c.id = g.car_id
"#;

/// Active car first, then newest additions.
#[tracing::instrument(skip(pool))]
pub async fn list_garage(
    user_id: Uuid,
    pool: &PgPool,
) -> Result<Vec<GarageCarRecord>, anyhow::Error> {
    let sql = format!(
        "{GARAGE_CAR_SELECT} WHERE g.user_id = $1 ORDER BY g.is_active DESC, g.created_at DESC"
    );

    sqlx::query_as::<_, GarageCarRecord>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to list garage cars")
}

#[tracing::instrument(skip(pool, garage_car))]
pub async fn insert_garage_car(
    user_id: Uuid,
    garage_car: &NewGarageCar,
    pool: &PgPool,
) -> Result<GarageCarRecord, GarageError> {
    let (car_exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1)")
            .bind(garage_car.car_id)
            .fetch_one(pool)
            .await
            .context("Failed to check that the catalog car exists")?;

    if !car_exists {
        return Err(GarageError::InvalidCar);
    }

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO garage_cars (user_id, car_id, nickname, purchase_date, mileage, modifications, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(garage_car.car_id)
    .bind(garage_car.details.nickname.as_deref())
    .bind(garage_car.details.purchase_date)
    .bind(garage_car.details.mileage)
    .bind(garage_car.details.modifications.as_deref())
    .bind(garage_car.details.image_url.as_deref())
    .fetch_one(pool)
    .await
    .context("Failed to insert garage car")?;

    get_garage_car(id, user_id, pool).await
}

#[tracing::instrument(skip(pool))]
pub async fn get_garage_car(
    id: i64,
    user_id: Uuid,
    pool: &PgPool,
) -> Result<GarageCarRecord, GarageError> {
    let sql = format!("{GARAGE_CAR_SELECT} WHERE g.id = $1 AND g.user_id = $2");

    sqlx::query_as::<_, GarageCarRecord>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch garage car")?
        .ok_or(GarageError::NotFound)
}

// Ownership gate shared by the mutation paths: missing row and foreign row
// surface as distinct conditions.
async fn check_ownership(id: i64, user_id: Uuid, pool: &PgPool) -> Result<(), GarageError> {
    let owner: Option<(Uuid,)> =
        sqlx::query_as("SELECT user_id FROM garage_cars WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("Failed to look up garage car owner")?;

    match owner {
        None => Err(GarageError::NotFound),
        Some((owner_id,)) if owner_id != user_id => Err(GarageError::Forbidden),
        Some(_) => Ok(()),
    }
}

#[tracing::instrument(skip(pool, details))]
pub async fn update_garage_car(
    id: i64,
    user_id: Uuid,
    details: &GarageCarDetails,
    pool: &PgPool,
) -> Result<GarageCarRecord, GarageError> {
    check_ownership(id, user_id, pool).await?;

    sqlx::query(
        r#"
        UPDATE garage_cars
        SET nickname = $1, purchase_date = $2, mileage = $3, modifications = $4, image_url = $5
        WHERE id = $6
        "#,
    )
    .bind(details.nickname.as_deref())
    .bind(details.purchase_date)
    .bind(details.mileage)
    .bind(details.modifications.as_deref())
    .bind(details.image_url.as_deref())
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update garage car")?;

    get_garage_car(id, user_id, pool).await
}

#[tracing::instrument(skip(pool))]
pub async fn delete_garage_car(id: i64, user_id: Uuid, pool: &PgPool) -> Result<(), GarageError> {
    check_ownership(id, user_id, pool).await?;

    sqlx::query("DELETE FROM garage_cars WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete garage car")?;

    Ok(())
}

/// A user shows at most one active car; clearing and setting happen in one
/// transaction so no window exposes two.
#[tracing::instrument(skip(pool))]
pub async fn set_active_garage_car(
    id: i64,
    user_id: Uuid,
    pool: &PgPool,
) -> Result<GarageCarRecord, GarageError> {
    check_ownership(id, user_id, pool).await?;

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    sqlx::query("UPDATE garage_cars SET is_active = false WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to clear active garage car")?;

    sqlx::query("UPDATE garage_cars SET is_active = true WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&mut *transaction)
        .await
        .context("Failed to set active garage car")?;

    transaction
        .commit()
        .await
        .context("Failed to commit active-car transaction")?;

    get_garage_car(id, user_id, pool).await
}
