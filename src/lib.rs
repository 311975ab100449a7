pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core values and models
pub use domain::{
    ByteRange, ByteStream, DomainValidationError, GetOutcome, GetRequest, HttpMetadata,
    ObjectKey, ObjectMeta, PartResult, StorageError, StorageResult, UploadId, UploadSession,
};

// Port types - interfaces for external systems
pub use ports::{Authenticator, MultipartService, ObjectService, ObjectStore};

// Service implementations - business logic
pub use services::{MultipartServiceImpl, ObjectServiceImpl, TokenAuthenticator, derive_token};

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppError, AppServices, StorageBackend, create_in_memory_app,
    create_s3_app,
};

// Adapter types - infrastructure implementations
pub use adapters::inbound::http::router::{AppState, create_router};
pub use adapters::outbound::storage::ApacheObjectStoreAdapter;

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        ApacheObjectStoreAdapter, AppBuilder, AppServices, AppState, MultipartService,
        ObjectKey, ObjectService, ObjectStore, UploadId, create_in_memory_app, create_router,
        create_s3_app, derive_token,
    };
}
