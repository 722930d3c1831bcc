use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authentication::UserId,
    domain::{CommentText, Cursor, NewComment, PageLimit},
    repository,
    session_state::TypedSession,
    utils,
};

#[derive(thiserror::Error)]
pub enum CommentError {
    #[error("{0}")]
    ValidationError(String),

    #[error("comment not found")]
    NotFound,

    #[error("parent comment does not belong to this review")]
    InvalidParent,

    #[error("not authorized to perform this action")]
    Forbidden,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for CommentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for CommentError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            CommentError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CommentError::InvalidParent => StatusCode::BAD_REQUEST,
            CommentError::NotFound => StatusCode::NOT_FOUND,
            CommentError::Forbidden => StatusCode::FORBIDDEN,
            CommentError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct ReviewPathParams {
    pub id: i64,
}

#[derive(Deserialize, Debug)]
pub struct CommentPathParams {
    pub review_id: i64,
    pub comment_id: i64,
}

#[tracing::instrument(skip(pool, session), fields(review_id=%path.id))]
pub async fn show_comments_for_review(
    path: web::Path<ReviewPathParams>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, CommentError> {
    let current_user = session.get_user_id().map_err(CommentError::UnexpectedError)?;

    let comments = repository::get_comments_for_review(path.id, current_user, &pool)
        .await
        .map_err(CommentError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "comments": comments })))
}

#[tracing::instrument(skip(pool), fields(user_id=%&*user_id))]
pub async fn create_comment(
    payload: web::Json<crate::domain::CreateCommentPayload>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, CommentError> {
    let user_id = user_id.into_inner();

    let comment: NewComment = payload
        .0
        .try_into()
        .map_err(CommentError::ValidationError)?;

    let node = repository::insert_comment(&comment, *user_id, &pool).await?;

    Ok(HttpResponse::Created().json(node))
}

#[tracing::instrument(skip(pool, payload), fields(comment_id=%path.comment_id))]
pub async fn update_comment(
    path: web::Path<CommentPathParams>,
    payload: web::Json<crate::domain::UpdateCommentPayload>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, CommentError> {
    let user_id = user_id.into_inner();

    let content = CommentText::parse(payload.0.content).map_err(CommentError::ValidationError)?;

    let node = repository::update_comment(
        path.comment_id,
        path.review_id,
        *user_id,
        content.as_ref(),
        &pool,
    )
    .await?;

    Ok(HttpResponse::Ok().json(node))
}

#[tracing::instrument(skip(pool), fields(comment_id=%path.comment_id))]
pub async fn delete_comment(
    path: web::Path<CommentPathParams>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, CommentError> {
    let user_id = user_id.into_inner();

    let removed =
        repository::delete_comment_tree(path.comment_id, path.review_id, *user_id, &pool).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed": removed })))
}

#[tracing::instrument(skip(pool), fields(comment_id=%path.comment_id))]
pub async fn like_comment(
    path: web::Path<CommentPathParams>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, CommentError> {
    let user_id = user_id.into_inner();

    let result =
        repository::toggle_comment_like(path.comment_id, path.review_id, *user_id, &pool).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[derive(Deserialize, Debug)]
pub struct LikedCommentsQuery {
    #[serde(default = "default_liked_limit")]
    pub limit: i64,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_liked_limit() -> i64 {
    20
}

#[derive(Deserialize, Debug)]
pub struct UserPathParams {
    pub user_id: Uuid,
}

#[tracing::instrument(skip(pool), fields(user_id=%path.user_id))]
pub async fn show_liked_comments(
    path: web::Path<UserPathParams>,
    query: web::Query<LikedCommentsQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, CommentError> {
    let limit = PageLimit::clamp(query.limit);
    let cursor = Cursor::decode_param(query.cursor.as_deref());

    let page = repository::list_liked_comments(path.user_id, limit, cursor, &pool)
        .await
        .map_err(CommentError::UnexpectedError)?;

    Ok(HttpResponse::Ok().json(page))
}
