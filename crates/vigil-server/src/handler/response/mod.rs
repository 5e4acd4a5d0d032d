//! Response types for HTTP handlers.

mod error_response;
mod health;

pub use error_response::ErrorResponse;
pub use health::Liveness;
