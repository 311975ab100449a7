mod multipart_service_impl;
mod object_service_impl;
mod token_authenticator;

pub use multipart_service_impl::MultipartServiceImpl;
pub use object_service_impl::ObjectServiceImpl;
pub use token_authenticator::{TokenAuthenticator, derive_token};
