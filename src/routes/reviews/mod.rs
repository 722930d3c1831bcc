mod review;
mod routes;

pub use review::*;
pub use routes::*;
