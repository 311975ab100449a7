// Infrastructure error conversions
pub mod error;

mod get_options;

pub mod staged_multipart;

pub mod apache_object_store_adapter;

// Re-export key types
pub use apache_object_store_adapter::{ApacheObjectStoreAdapter, DEFAULT_CHUNK_SIZE};
pub use staged_multipart::StagedMultipartStore;
