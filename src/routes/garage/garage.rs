use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    authentication::UserId,
    domain::{
        AddGarageCarPayload, GarageCarDetails, GarageCarResponseBody, NewGarageCar,
        UpdateGarageCarPayload,
    },
    repository, utils,
};

#[derive(thiserror::Error)]
pub enum GarageError {
    #[error("{0}")]
    ValidationError(String),

    #[error("car is not in the catalog")]
    InvalidCar,

    #[error("garage car not found")]
    NotFound,

    #[error("not authorized to perform this action")]
    Forbidden,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for GarageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for GarageError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            GarageError::ValidationError(_) => StatusCode::BAD_REQUEST,
            GarageError::InvalidCar => StatusCode::BAD_REQUEST,
            GarageError::NotFound => StatusCode::NOT_FOUND,
            GarageError::Forbidden => StatusCode::FORBIDDEN,
            GarageError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct GaragePathParams {
    pub id: i64,
}

#[tracing::instrument(skip(pool), fields(user_id=%&*user_id))]
pub async fn show_garage(
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, GarageError> {
    let user_id = user_id.into_inner();

    let cars = repository::list_garage(*user_id, &pool)
        .await
        .map_err(GarageError::UnexpectedError)?;

    let cars: Vec<GarageCarResponseBody> =
        cars.into_iter().map(GarageCarResponseBody::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "cars": cars })))
}

#[tracing::instrument(skip_all, fields(user_id=%&*user_id))]
pub async fn add_garage_car(
    payload: web::Json<AddGarageCarPayload>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, GarageError> {
    let user_id = user_id.into_inner();

    let garage_car: NewGarageCar = payload
        .0
        .try_into()
        .map_err(GarageError::ValidationError)?;

    let record = repository::insert_garage_car(*user_id, &garage_car, &pool).await?;

    Ok(HttpResponse::Created().json(GarageCarResponseBody::from(record)))
}

#[tracing::instrument(skip(pool, payload), fields(garage_car_id=%path.id))]
pub async fn update_garage_car(
    path: web::Path<GaragePathParams>,
    payload: web::Json<UpdateGarageCarPayload>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, GarageError> {
    let user_id = user_id.into_inner();

    let details: GarageCarDetails = payload
        .0
        .try_into()
        .map_err(GarageError::ValidationError)?;

    let record = repository::update_garage_car(path.id, *user_id, &details, &pool).await?;

    Ok(HttpResponse::Ok().json(GarageCarResponseBody::from(record)))
}

#[tracing::instrument(skip(pool), fields(garage_car_id=%path.id))]
pub async fn delete_garage_car(
    path: web::Path<GaragePathParams>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, GarageError> {
    let user_id = user_id.into_inner();

    repository::delete_garage_car(path.id, *user_id, &pool).await?;

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(pool), fields(garage_car_id=%path.id))]
pub async fn activate_garage_car(
    path: web::Path<GaragePathParams>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, GarageError> {
    let user_id = user_id.into_inner();

    let record = repository::set_active_garage_car(path.id, *user_id, &pool).await?;

    Ok(HttpResponse::Ok().json(GarageCarResponseBody::from(record)))
}
