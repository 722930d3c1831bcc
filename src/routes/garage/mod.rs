mod garage;
mod routes;

pub use garage::*;
pub use routes::*;
