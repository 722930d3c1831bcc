mod car;
mod routes;

pub use car::*;
pub use routes::*;
