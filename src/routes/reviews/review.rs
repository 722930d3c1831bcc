use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authentication::UserId,
    domain::{
        CreateReviewPayload, CreateReviewResponse, Cursor, NewReview, PageLimit,
        UpdateReviewStatusPayload,
    },
    repository,
    session_state::TypedSession,
    utils,
};

#[derive(thiserror::Error)]
pub enum ReviewError {
    #[error("{0}")]
    ValidationError(String),

    #[error("review not found")]
    NotFound,

    #[error("not authorized to perform this action")]
    Forbidden,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for ReviewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for ReviewError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            ReviewError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ReviewError::NotFound => StatusCode::NOT_FOUND,
            ReviewError::Forbidden => StatusCode::FORBIDDEN,
            ReviewError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct ReviewPath {
    pub id: i64,
}

#[tracing::instrument(skip_all, fields(user_id=%&*user_id))]
pub async fn create_review(
    payload: web::Json<CreateReviewPayload>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ReviewError> {
    let user_id = user_id.into_inner();

    let review: NewReview = payload
        .0
        .try_into()
        .map_err(ReviewError::ValidationError)?;

    let car_exists = repository::car_exists(review.car_id, &pool)
        .await
        .map_err(ReviewError::UnexpectedError)?;
    if !car_exists {
        return Err(ReviewError::ValidationError(
            "Unknown car: pick one from the catalog.".to_string(),
        ));
    }

    let review_id = repository::insert_review(*user_id, &review, &pool)
        .await
        .map_err(ReviewError::UnexpectedError)?;

    Ok(HttpResponse::Created().json(CreateReviewResponse { review_id }))
}

#[tracing::instrument(skip(pool, session), fields(review_id=%path.id))]
pub async fn show_review(
    path: web::Path<ReviewPath>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, ReviewError> {
    let current_user = session.get_user_id().map_err(ReviewError::UnexpectedError)?;

    let review = repository::get_published_review(path.id, current_user, &pool).await?;

    Ok(HttpResponse::Ok().json(review))
}

#[tracing::instrument(skip(pool, payload), fields(review_id=%path.id))]
pub async fn update_review(
    path: web::Path<ReviewPath>,
    payload: web::Json<CreateReviewPayload>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ReviewError> {
    let user_id = user_id.into_inner();

    let review: NewReview = payload
        .0
        .try_into()
        .map_err(ReviewError::ValidationError)?;

    let car_exists = repository::car_exists(review.car_id, &pool)
        .await
        .map_err(ReviewError::UnexpectedError)?;
    if !car_exists {
        return Err(ReviewError::ValidationError(
            "Unknown car: pick one from the catalog.".to_string(),
        ));
    }

    let result = repository::update_review(path.id, *user_id, &review, &pool).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[tracing::instrument(skip(pool), fields(review_id=%path.id))]
pub async fn update_review_status(
    path: web::Path<ReviewPath>,
    payload: web::Json<UpdateReviewStatusPayload>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ReviewError> {
    let user_id = user_id.into_inner();

    let result =
        repository::update_review_status(path.id, *user_id, payload.status, &pool).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[tracing::instrument(skip(pool), fields(review_id=%path.id))]
pub async fn delete_review(
    path: web::Path<ReviewPath>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ReviewError> {
    let user_id = user_id.into_inner();

    repository::delete_review(path.id, *user_id, &pool).await?;

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(pool), fields(review_id=%path.id))]
pub async fn like_review(
    path: web::Path<ReviewPath>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ReviewError> {
    let user_id = user_id.into_inner();

    let result = repository::toggle_review_like(path.id, *user_id, &pool).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[tracing::instrument(skip(pool), fields(review_id=%path.id))]
pub async fn bookmark_review(
    path: web::Path<ReviewPath>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ReviewError> {
    let user_id = user_id.into_inner();

    let result = repository::toggle_bookmark(path.id, *user_id, &pool).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[derive(Deserialize, Debug)]
pub struct SavedReviewsQuery {
    #[serde(default = "default_saved_limit")]
    pub limit: i64,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_saved_limit() -> i64 {
    20
}

#[derive(Deserialize, Debug)]
pub struct LikedReviewsPath {
    pub user_id: Uuid,
}

#[tracing::instrument(skip(pool, session), fields(user_id=%path.user_id))]
pub async fn show_liked_reviews(
    path: web::Path<LikedReviewsPath>,
    query: web::Query<SavedReviewsQuery>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, ReviewError> {
    let current_user = session.get_user_id().map_err(ReviewError::UnexpectedError)?;

    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::list_liked_reviews(path.user_id, limit, cursor, current_user, &pool)
        .await
        .map_err(ReviewError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(page))
}

#[tracing::instrument(skip(pool), fields(user_id=%&*user_id))]
pub async fn show_bookmarked_reviews(
    query: web::Query<SavedReviewsQuery>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ReviewError> {
    let user_id = user_id.into_inner();

    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::list_bookmarked_reviews(*user_id, limit, cursor, &pool)
        .await
        .map_err(ReviewError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(page))
}
