mod authenticator;
mod multipart_service;
mod object_service;

pub use authenticator::Authenticator;
pub use multipart_service::MultipartService;
pub use object_service::ObjectService;
