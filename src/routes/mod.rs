mod cars;
mod comments;
mod feed;
mod garage;
mod health_check;
mod reviews;
mod users;

pub use cars::*;
pub use comments::*;
pub use feed::*;
pub use garage::*;
pub use health_check::*;
pub use reviews::*;
pub use users::*;
