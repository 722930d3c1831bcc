mod car;
mod comment;
mod feed;
mod follow;
mod garage;
mod review;
mod user;

pub use car::*;
pub use comment::*;
pub use feed::*;
pub use follow::*;
pub use garage::*;
pub use review::*;
pub use user::*;
