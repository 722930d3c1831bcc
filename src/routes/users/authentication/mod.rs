mod change_password;
mod login;
mod register;

pub use change_password::*;
pub use login::*;
pub use register::*;
