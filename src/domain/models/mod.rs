pub mod multipart;
pub mod object;

pub use multipart::*;
pub use object::*;
