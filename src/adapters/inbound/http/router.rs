use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use super::{
    handlers::{finish_upload, get_object, init_upload, upload_object, upload_part, welcome},
    middleware::require_bearer,
};
use crate::ports::services::{Authenticator, MultipartService, ObjectService};

/// Default ceiling for a single multipart part body
pub const DEFAULT_MAX_PART_SIZE: usize = 64 * 1024 * 1024;

/// Application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub object_service: Arc<dyn ObjectService>,
    pub multipart_service: Arc<dyn MultipartService>,
    pub authenticator: Arc<dyn Authenticator>,
    /// Largest part body accepted; parts are buffered before reaching the store
    pub max_part_size: usize,
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(create_protected_router(state.clone()))
        .with_state(state)
}

/// Routes guarded by the bearer token
pub fn create_protected_router(state: AppState) -> Router<AppState> {
    let part_limit = RequestBodyLimitLayer::new(state.max_part_size);

    Router::new()
        .route("/{name}", get(get_object))
        .route("/upload/{name}", post(upload_object))
        .route("/upload-part/init/{name}", post(init_upload))
        .route(
            "/upload-part/put/{name}/{upload_id}",
            put(upload_part).layer(part_limit),
        )
        .route("/upload-part/finish/{name}/{upload_id}", post(finish_upload))
        .route_layer(middleware::from_fn_with_state(state, require_bearer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::outbound::storage::ApacheObjectStoreAdapter,
        ports::storage::ObjectStore,
        services::{MultipartServiceImpl, ObjectServiceImpl, TokenAuthenticator, derive_token},
    };
    use axum::http::{HeaderValue, StatusCode, header};
    use axum_test::TestServer;

    fn create_test_app_state() -> AppState {
        let store: Arc<dyn ObjectStore> = Arc::new(ApacheObjectStoreAdapter::in_memory());

        AppState {
            object_service: Arc::new(ObjectServiceImpl::new(store.clone())),
            multipart_service: Arc::new(MultipartServiceImpl::new(store)),
            authenticator: Arc::new(TokenAuthenticator::from_secret("secret")),
            max_part_size: 8,
        }
    }

    #[tokio::test]
    async fn test_welcome_is_public() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text("Welcome to white space.");
    }

    #[tokio::test]
    async fn test_protected_routes_challenge() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();

        let response = server.get("/anything").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.header(header::WWW_AUTHENTICATE),
            "Bearer realm=\"object-gateway\""
        );

        let response = server
            .post("/upload-part/init/anything")
            .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.header(header::WWW_AUTHENTICATE),
            "Bearer realm=\"object-gateway\", error=\"invalid_token\""
        );
    }

    #[tokio::test]
    async fn test_accepted_token_reaches_handler() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();
        let token = format!("Bearer {}", derive_token("secret"));

        let response = server
            .get("/missing")
            .add_header(header::AUTHORIZATION, HeaderValue::from_str(&token).unwrap())
            .await;

        response.assert_status_not_found();
        response.assert_text("not found");
    }

    #[tokio::test]
    async fn test_oversized_part_rejected() {
        let server = TestServer::new(create_router(create_test_app_state())).unwrap();
        let token = format!("Bearer {}", derive_token("secret"));

        let response = server
            .put("/upload-part/put/big.bin/1")
            .add_query_param("partNumber", 1)
            .add_header(header::AUTHORIZATION, HeaderValue::from_str(&token).unwrap())
            .bytes(bytes::Bytes::from_static(b"nine bytes"))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
