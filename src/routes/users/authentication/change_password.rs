use std::fmt::{self, Debug, Formatter};

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::{
    authentication,
    authentication::{AuthError, Credentials, UserId},
    domain::{ChangePasswordData, UserPassword},
    repository, utils,
};

#[derive(thiserror::Error)]
pub enum ChangePasswordError {
    #[error("{0}")]
    ValidationError(String),

    #[error("The current password is incorrect")]
    IncorrectPassword(#[source] anyhow::Error),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for ChangePasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

impl ResponseError for ChangePasswordError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            ChangePasswordError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ChangePasswordError::IncorrectPassword(_) => StatusCode::UNAUTHORIZED,
            ChangePasswordError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        utils::build_error_response(status_code, self.to_string())
    }
}

#[tracing::instrument(skip_all, fields(user_id=%&*user_id))]
pub async fn change_password(
    payload: web::Json<ChangePasswordData>,
    pool: web::Data<PgPool>,
    user_id: web::ReqData<UserId>,
) -> Result<HttpResponse, ChangePasswordError> {
    let user_id = user_id.into_inner();

    let new_password =
        UserPassword::parse(payload.new_password.expose_secret().to_string())
            .map_err(ChangePasswordError::ValidationError)?;

    // Re-check the current password before accepting the change
    let username = repository::get_username_by_id(*user_id, &pool).await?;
    let credentials = Credentials {
        username,
        password: payload.current_password.clone(),
    };

    authentication::validate_credentials(credentials, &pool)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials(_) => ChangePasswordError::IncorrectPassword(e.into()),
            AuthError::UnexpectedError(_) => ChangePasswordError::UnexpectedError(e.into()),
        })?;

    authentication::change_password(*user_id, new_password.into_secret(), &pool).await?;

    Ok(HttpResponse::Ok().finish())
}
