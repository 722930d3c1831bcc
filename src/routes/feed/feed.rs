use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    authentication::UserId,
    domain::{Cursor, PageLimit},
    repository,
    session_state::TypedSession,
    utils,
};

#[derive(thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for FeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for FeedError {
    fn error_response(&self) -> HttpResponse {
        let FeedError::UnexpectedError(_) = self;
        utils::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct FeedQuery {
    #[serde(default = "default_feed_limit")]
    pub limit: i64,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_feed_limit() -> i64 {
    10
}

#[tracing::instrument(skip(pool, session))]
pub async fn latest_feed(
    query: web::Query<FeedQuery>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, FeedError> {
    let current_user = session.get_user_id().map_err(FeedError::UnexpectedError)?;

    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::latest_feed(limit, cursor, current_user, &pool).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[tracing::instrument(skip(pool, session))]
pub async fn trending_feed(
    query: web::Query<FeedQuery>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, FeedError> {
    let current_user = session.get_user_id().map_err(FeedError::UnexpectedError)?;

    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::trending_feed(limit, cursor, current_user, &pool).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[tracing::instrument(skip(pool), fields(user_id=%&*user_id))]
pub async fn personalized_feed(
    query: web::Query<FeedQuery>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, FeedError> {
    let user_id = user_id.into_inner();

    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::personalized_feed(*user_id, limit, cursor, &pool).await?;

    Ok(HttpResponse::Ok().json(page))
}
