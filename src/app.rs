use object_store::aws::AmazonS3Builder;
use std::sync::Arc;
use tracing::info;

use crate::{
    adapters::{
        inbound::http::router::{AppState, DEFAULT_MAX_PART_SIZE, create_router},
        outbound::storage::{ApacheObjectStoreAdapter, DEFAULT_CHUNK_SIZE},
    },
    ports::storage::ObjectStore,
    services::{MultipartServiceImpl, ObjectServiceImpl, TokenAuthenticator},
};

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    /// Shared secret from which the bearer token is derived
    pub auth_token: String,
    /// Buffer size for streamed simple uploads
    pub chunk_size: usize,
    /// Largest accepted multipart part body
    pub max_part_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::InMemory,
            auth_token: String::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_part_size: DEFAULT_MAX_PART_SIZE,
        }
    }
}

/// Storage backend configuration
#[derive(Clone)]
pub enum StorageBackend {
    InMemory,
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        allow_http: bool,
    },
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::InMemory => f.write_str("InMemory"),
            StorageBackend::S3 {
                bucket,
                region,
                endpoint,
                allow_http,
                ..
            } => f
                .debug_struct("S3")
                .field("bucket", bucket)
                .field("region", region)
                .field("endpoint", endpoint)
                .field("allow_http", allow_http)
                .finish_non_exhaustive(),
        }
    }
}

/// Application services container
pub struct AppServices {
    pub object_service: ObjectServiceImpl,
    pub multipart_service: MultipartServiceImpl,
    pub authenticator: TokenAuthenticator,
    pub max_part_size: usize,
}

impl AppServices {
    /// Wrap the services into shareable router state
    pub fn into_state(self) -> AppState {
        AppState {
            object_service: Arc::new(self.object_service),
            multipart_service: Arc::new(self.multipart_service),
            authenticator: Arc::new(self.authenticator),
            max_part_size: self.max_part_size,
        }
    }

    /// Build the complete HTTP router
    pub fn into_router(self) -> axum::Router {
        create_router(self.into_state())
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Configure the shared secret
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = token.into();
        self
    }

    /// Configure the simple-upload chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Configure the largest accepted part body
    pub fn with_max_part_size(mut self, max_part_size: usize) -> Self {
        self.config.max_part_size = max_part_size;
        self
    }

    /// Build the complete application with services
    pub fn build(self) -> Result<AppServices, AppError> {
        if self.config.auth_token.is_empty() {
            return Err(AppError::Configuration {
                message: "auth token must not be empty".to_string(),
            });
        }
        if self.config.chunk_size == 0 {
            return Err(AppError::Configuration {
                message: "chunk size must be greater than zero".to_string(),
            });
        }
        if self.config.max_part_size == 0 {
            return Err(AppError::Configuration {
                message: "max part size must be greater than zero".to_string(),
            });
        }

        let store = self.create_storage_adapter()?;

        Ok(AppServices {
            object_service: ObjectServiceImpl::new(store.clone()),
            multipart_service: MultipartServiceImpl::new(store),
            authenticator: TokenAuthenticator::from_secret(&self.config.auth_token),
            max_part_size: self.config.max_part_size,
        })
    }

    /// Create the storage adapter based on configuration
    fn create_storage_adapter(&self) -> Result<Arc<dyn ObjectStore>, AppError> {
        let chunk_size = self.config.chunk_size;

        match &self.config.storage_backend {
            StorageBackend::InMemory => {
                info!("using in-memory storage backend");
                let adapter = ApacheObjectStoreAdapter::in_memory().with_chunk_size(chunk_size);
                Ok(Arc::new(adapter))
            }
            StorageBackend::S3 {
                bucket,
                region,
                endpoint,
                access_key,
                secret_key,
                allow_http,
            } => {
                info!(bucket = %bucket, region = %region, "using S3 storage backend");

                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(region)
                    .with_allow_http(*allow_http);
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(access_key) = access_key {
                    builder = builder.with_access_key_id(access_key);
                }
                if let Some(secret_key) = secret_key {
                    builder = builder.with_secret_access_key(secret_key);
                }

                let store = builder.build().map_err(|e| AppError::StorageInit {
                    message: e.to_string(),
                })?;
                let adapter =
                    ApacheObjectStoreAdapter::new(Arc::new(store)).with_chunk_size(chunk_size);
                Ok(Arc::new(adapter))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Create an in-memory application for testing and development
pub fn create_in_memory_app(auth_token: &str) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .with_auth_token(auth_token)
        .build()
}

/// Create an S3-backed application
pub fn create_s3_app(
    auth_token: &str,
    bucket: String,
    region: String,
    access_key: Option<String>,
    secret_key: Option<String>,
) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::S3 {
            bucket,
            region,
            endpoint: None,
            access_key,
            secret_key,
            allow_http: false,
        })
        .with_auth_token(auth_token)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::services::Authenticator;
    use crate::services::derive_token;

    #[test]
    fn test_create_in_memory_app() {
        let app = create_in_memory_app("secret").unwrap();

        assert!(app.authenticator.verify(&derive_token("secret")));
        assert!(!app.authenticator.verify("secret"));
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = AppBuilder::new().build();

        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = AppBuilder::new()
            .with_auth_token("secret")
            .with_chunk_size(0)
            .build();

        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[test]
    fn test_max_part_size_reaches_router_state() {
        let state = AppBuilder::new()
            .with_auth_token("secret")
            .with_max_part_size(1024)
            .build()
            .unwrap()
            .into_state();

        assert_eq!(state.max_part_size, 1024);
    }

    #[test]
    fn test_zero_max_part_size_rejected() {
        let result = AppBuilder::new()
            .with_auth_token("secret")
            .with_max_part_size(0)
            .build();

        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[test]
    fn test_s3_backend_builds_without_network() {
        let app = AppBuilder::new()
            .with_auth_token("secret")
            .with_storage_backend(StorageBackend::S3 {
                bucket: "bucket".to_string(),
                region: "us-east-1".to_string(),
                endpoint: Some("http://localhost:9000".to_string()),
                access_key: Some("key".to_string()),
                secret_key: Some("secret".to_string()),
                allow_http: true,
            })
            .build();

        assert!(app.is_ok());
    }

    #[test]
    fn test_backend_debug_hides_credentials() {
        let backend = StorageBackend::S3 {
            bucket: "bucket".to_string(),
            region: "eu-west-1".to_string(),
            endpoint: None,
            access_key: Some("AKIA".to_string()),
            secret_key: Some("hunter2".to_string()),
            allow_http: false,
        };

        let rendered = format!("{:?}", backend);
        assert!(rendered.contains("bucket"));
        assert!(!rendered.contains("hunter2"));
    }
}
