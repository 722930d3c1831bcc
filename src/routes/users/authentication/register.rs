use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use anyhow::Context;
use sqlx::PgPool;
use tracing::{Span, field};

use crate::{
    authentication,
    domain::{NewUser, RegisterData},
    repository, telemetry, utils,
};

#[derive(thiserror::Error)]
pub enum RegisterError {
    // the 0 is something like `self.0` and will print the String value the ValidationError wraps around
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for RegisterError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            RegisterError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RegisterError::Conflict(_) => StatusCode::CONFLICT,
            RegisterError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[tracing::instrument(
    skip_all,
    fields(
        username = tracing::field::Empty,
        user_email = tracing::field::Empty
    )
)]
pub async fn register_user(
    payload: web::Json<RegisterData>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, RegisterError> {
    // ValidationError doesn't have a from or source hence we have to map this error to the correct enum variant
    let NewUser {
        email,
        username,
        password,
        display_name,
    } = payload
        .0
        .try_into()
        .map_err(RegisterError::ValidationError)?;

    Span::current().record("username", field::display(&username));
    Span::current().record("user_email", field::display(&email));

    if repository::email_exists(email.as_ref(), &pool).await? {
        return Err(RegisterError::Conflict("Email is already in use".to_string()));
    }

    if repository::username_exists(username.as_ref(), &pool).await? {
        return Err(RegisterError::Conflict(
            "Username is already taken".to_string(),
        ));
    }

    let password = password.into_secret();
    let password_hash = telemetry::spawn_blocking_with_tracing(move || {
        authentication::compute_password_hash(password)
    })
    .await
    .context("Failed to spawn blocking task.")?
    .context("Failed to hash password")?;

    let (id, _created_at) = repository::insert_user(
        &username,
        &email,
        display_name.as_deref(),
        password_hash,
        &pool,
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "id": id,
        "username": username.as_ref(),
        "email": email.as_ref(),
    })))
}
