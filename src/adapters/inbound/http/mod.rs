pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod headers;
pub mod middleware;
pub mod router;

pub use dto::*;
pub use error::ApiError;
pub use handlers::*;
pub use middleware::*;
pub use router::*;
