mod middleware;
mod password;

pub use middleware::UserId;
pub use middleware::reject_anonymous_users;
pub use password::{
    AuthError, Credentials, change_password, compute_password_hash, validate_credentials,
};
