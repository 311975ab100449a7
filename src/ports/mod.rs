pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use services::{Authenticator, MultipartService, ObjectService};
pub use storage::ObjectStore;
