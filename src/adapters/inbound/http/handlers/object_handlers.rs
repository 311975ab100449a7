use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};

use crate::{
    adapters::inbound::http::{
        error::ApiError,
        extract::{RequestBody, body_stream},
        headers::{get_request, http_metadata, object_headers},
        router::AppState,
    },
    domain::{
        models::{ByteStream, GetOutcome},
        value_objects::ObjectKey,
    },
};

const WELCOME: &str = "Welcome to white space.";

/// Unauthenticated liveness route
pub async fn welcome() -> &'static str {
    WELCOME
}

/// Handle object retrieval with range and conditional semantics
pub async fn get_object(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let key = ObjectKey::new(name).map_err(ApiError::InvalidKey)?;

    let request = get_request(&headers);
    // 206 follows the request, not the store: a Range value the store ignores
    // (multi-range, malformed) still yields 206, with the full body and no
    // content-range.
    let status = if request.has_range() {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let response = match app_state.object_service.get_object(&key, request).await? {
        GetOutcome::NotFound => return Err(ApiError::NotFound),
        GetOutcome::NotModified(meta) => {
            build_response(StatusCode::NOT_MODIFIED, object_headers(&meta), Body::empty())
        }
        GetOutcome::Partial { meta, range, body } => {
            let mut headers = object_headers(&meta);
            let content_range = range.content_range(meta.size);
            if let Ok(value) = HeaderValue::from_str(&content_range) {
                headers.insert(header::CONTENT_RANGE, value);
            }
            let end = range.end.unwrap_or_else(|| meta.size.saturating_sub(1));
            let length = (end + 1).saturating_sub(range.offset);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
            build_response(status, headers, streamed(body))
        }
        GetOutcome::Full { meta, body } => {
            let mut headers = object_headers(&meta);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(meta.size));
            build_response(status, headers, streamed(body))
        }
    };

    Ok(response)
}

/// Handle single-request object upload
pub async fn upload_object(
    State(app_state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    RequestBody(body): RequestBody,
) -> Result<String, ApiError> {
    let body = body.ok_or(ApiError::EmptyBody)?;
    let key = ObjectKey::new(name).map_err(ApiError::InvalidKey)?;

    let meta = app_state
        .object_service
        .put_object(&key, http_metadata(&headers), body_stream(body))
        .await?;

    Ok(meta.key.into_inner())
}

fn streamed(body: ByteStream) -> Body {
    Body::from_stream(body)
}

fn build_response(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
