pub mod multipart_handlers;
pub mod object_handlers;

pub use multipart_handlers::*;
pub use object_handlers::*;
