use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authentication::UserId,
    domain::{Cursor, PageLimit, ToggleFollowResponse},
    repository,
    session_state::TypedSession,
    utils,
};

#[derive(thiserror::Error)]
pub enum FollowError {
    #[error("cannot follow yourself")]
    SelfFollow,

    #[error("user not found")]
    NotFound,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for FollowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for FollowError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            FollowError::SelfFollow => StatusCode::BAD_REQUEST,
            FollowError::NotFound => StatusCode::NOT_FOUND,
            FollowError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct FollowPathParams {
    pub id: Uuid,
}

#[tracing::instrument(skip(pool), fields(target_user_id=%path.id, user_id=%&*user_id))]
pub async fn toggle_follow(
    path: web::Path<FollowPathParams>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, FollowError> {
    let user_id = user_id.into_inner();

    if *user_id == path.id {
        return Err(FollowError::SelfFollow);
    }

    let following = repository::toggle_follow(*user_id, path.id, &pool).await?;

    Ok(HttpResponse::Ok().json(ToggleFollowResponse { following }))
}

/// Whether the caller follows the target; anonymous callers simply don't.
#[tracing::instrument(skip(pool, session), fields(target_user_id=%path.id))]
pub async fn show_follow_status(
    path: web::Path<FollowPathParams>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, FollowError> {
    let following = match session.get_user_id().map_err(FollowError::UnexpectedError)? {
        Some(user_id) if user_id != path.id => {
            repository::is_following(user_id, path.id, &pool).await?
        }
        _ => false,
    };

    Ok(HttpResponse::Ok().json(ToggleFollowResponse { following }))
}

#[derive(Deserialize, Debug)]
pub struct FollowListQuery {
    #[serde(default = "default_follow_limit")]
    pub limit: i64,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_follow_limit() -> i64 {
    20
}

#[tracing::instrument(skip(pool), fields(user_id=%path.id))]
pub async fn show_followers(
    path: web::Path<FollowPathParams>,
    query: web::Query<FollowListQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, FollowError> {
    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::list_followers(path.id, limit, cursor, &pool)
        .await
        .map_err(FollowError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(page))
}

#[tracing::instrument(skip(pool), fields(user_id=%path.id))]
pub async fn show_following(
    path: web::Path<FollowPathParams>,
    query: web::Query<FollowListQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, FollowError> {
    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::list_following(path.id, limit, cursor, &pool)
        .await
        .map_err(FollowError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(page))
}
