use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    domain::{CarSearchQuery, Cursor, PageLimit},
    repository, utils,
};

#[derive(thiserror::Error)]
pub enum CarError {
    #[error("{0}")]
    ValidationError(String),

    #[error("car not found")]
    NotFound,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for CarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for CarError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            CarError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CarError::NotFound => StatusCode::NOT_FOUND,
            CarError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct CarListingQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_car_limit")]
    pub limit: i64,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_car_limit() -> i64 {
    20
}

#[tracing::instrument(skip(pool))]
pub async fn list_cars(
    query: web::Query<CarListingQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, CarError> {
    let search =
        CarSearchQuery::parse(query.query.clone()).map_err(CarError::ValidationError)?;
    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::list_cars(Some(&search), limit, cursor, &pool)
        .await
        .map_err(CarError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(page))
}

#[derive(Deserialize, Debug)]
pub struct CarPathParams {
    pub id: i64,
}

#[tracing::instrument(skip(pool), fields(car_id=%path.id))]
pub async fn show_car(
    path: web::Path<CarPathParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, CarError> {
    let car = repository::get_car(path.id, &pool)
        .await
        .map_err(CarError::UnexpectedError)?
        .ok_or(CarError::NotFound)?;

    Ok(HttpResponse::Ok().json(car))
}
