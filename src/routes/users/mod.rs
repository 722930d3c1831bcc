mod authentication;
mod follow;
mod routes;
mod user;

pub use authentication::*;
pub use follow::*;
pub use routes::*;
pub use user::*;
