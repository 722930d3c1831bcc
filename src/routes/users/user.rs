use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    domain::{Cursor, PageLimit, ProfileResponseBody},
    repository, utils,
};

#[derive(thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    ValidationError(String),

    #[error("user not found")]
    NotFound,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for UserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for UserError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            UserError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct ProfilePathParams {
    pub username: String,
}

#[tracing::instrument(skip(pool), fields(username=%path.username))]
pub async fn show_profile(
    path: web::Path<ProfilePathParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, UserError> {
    let record = repository::get_profile_by_username(&path.username.to_lowercase(), &pool)
        .await
        .map_err(UserError::UnexpectedError)?
        .ok_or(UserError::NotFound)?;

    let follower_count = repository::count_followers(record.id, &pool).await?;
    let following_count = repository::count_following(record.id, &pool).await?;

    let profile = ProfileResponseBody::from_parts(record, follower_count, following_count);

    Ok(HttpResponse::Ok().json(profile))
}

#[derive(Deserialize, Debug)]
pub struct UserSearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_search_limit() -> i64 {
    20
}

#[tracing::instrument(skip(pool))]
pub async fn search_users(
    query: web::Query<UserSearchParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, UserError> {
    if query.q.len() > 50 {
        return Err(UserError::ValidationError(
            "Invalid search query: cannot exceed 50 characters.".to_string(),
        ));
    }

    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::search_users(&query.q, limit, cursor, &pool)
        .await
        .map_err(UserError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(page))
}
