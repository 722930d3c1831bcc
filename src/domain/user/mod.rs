mod new_user;
mod types;
mod user_email;
mod user_name;
mod user_password;

pub use new_user::NewUser;
pub use types::*;
pub use user_email::UserEmail;
pub use user_name::UserName;
pub use user_password::UserPassword;
