mod feed;
mod routes;

pub use feed::*;
pub use routes::*;
