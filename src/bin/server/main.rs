use anyhow::{Context, Result};
use clap::Parser;
use object_gateway::{
    adapters::{
        inbound::http::router::DEFAULT_MAX_PART_SIZE, outbound::storage::DEFAULT_CHUNK_SIZE,
    },
    app::{AppBuilder, AppConfig, StorageBackend},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "object-gateway")]
#[command(about = "An authenticated HTTP gateway over an object store", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Shared secret; clients present hex(SHA-1(secret)) as their bearer token
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    auth_token: String,

    /// Storage backend type (memory or s3)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    storage_backend: String,

    /// S3 endpoint URL, for S3-compatible services
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// S3 bucket name
    #[arg(long, env = "S3_BUCKET")]
    s3_bucket: Option<String>,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    s3_region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY", hide_env_values = true)]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY", hide_env_values = true)]
    s3_secret_key: Option<String>,

    /// Allow plain HTTP connections to the S3 endpoint
    #[arg(long, env = "S3_ALLOW_HTTP", default_value = "false")]
    s3_allow_http: bool,

    /// Buffer size in bytes for streamed uploads
    #[arg(long, env = "UPLOAD_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    upload_chunk_size: usize,

    /// Largest multipart part body in bytes
    #[arg(long, env = "UPLOAD_MAX_PART_SIZE", default_value_t = DEFAULT_MAX_PART_SIZE)]
    upload_max_part_size: usize,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory,
            "s3" => {
                let bucket = self
                    .s3_bucket
                    .clone()
                    .context("S3_BUCKET is required for S3 backend")?;

                StorageBackend::S3 {
                    bucket,
                    region: self.s3_region.clone(),
                    endpoint: self.s3_endpoint.clone(),
                    access_key: self.s3_access_key.clone(),
                    secret_key: self.s3_secret_key.clone(),
                    allow_http: self.s3_allow_http,
                }
            }
            _ => anyhow::bail!("Unknown storage backend: {}", self.storage_backend),
        };

        Ok(AppConfig {
            storage_backend,
            auth_token: self.auth_token.clone(),
            chunk_size: self.upload_chunk_size,
            max_part_size: self.upload_max_part_size,
        })
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.log_level.to_lowercase()))
            .context("Invalid log level")?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to initialize logging")?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting object gateway");
    info!("Storage backend: {}", cli.storage_backend);

    let config = cli.to_app_config()?;
    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .context("Failed to build application")?;

    let router = app_services
        .into_router()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "object-gateway",
            "--port",
            "8080",
            "--auth-token",
            "secret",
            "--storage-backend",
            "s3",
            "--s3-bucket",
            "test-bucket",
            "--s3-endpoint",
            "http://localhost:9000",
            "--s3-allow-http",
            "--upload-max-part-size",
            "1048576",
        ]);

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.storage_backend, "s3");
        assert_eq!(cli.s3_bucket, Some("test-bucket".to_string()));
        assert_eq!(cli.upload_max_part_size, 1048576);

        let config = cli.to_app_config().unwrap();
        match config.storage_backend {
            StorageBackend::S3 {
                endpoint,
                allow_http,
                ..
            } => {
                assert_eq!(endpoint.as_deref(), Some("http://localhost:9000"));
                assert!(allow_http);
            }
            _ => panic!("Expected S3 backend"),
        }
    }

    #[test]
    fn test_memory_config() {
        let cli = Cli::parse_from(["object-gateway", "--auth-token", "secret"]);

        let config = cli.to_app_config().unwrap();
        assert!(matches!(config.storage_backend, StorageBackend::InMemory));
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.max_part_size, DEFAULT_MAX_PART_SIZE);
        assert_eq!(config.auth_token, "secret");
    }

    #[test]
    fn test_s3_requires_bucket() {
        let cli = Cli::parse_from([
            "object-gateway",
            "--auth-token",
            "secret",
            "--storage-backend",
            "s3",
        ]);

        assert!(cli.to_app_config().is_err());
    }

    #[test]
    fn test_unknown_backend() {
        let cli = Cli::parse_from([
            "object-gateway",
            "--auth-token",
            "secret",
            "--storage-backend",
            "ftp",
        ]);

        assert!(cli.to_app_config().is_err());
    }
}
