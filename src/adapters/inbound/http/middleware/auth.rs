use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::adapters::inbound::http::{error::ApiError, router::AppState};

/// Extract the credential of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

/// Reject requests that do not carry the shared bearer token.
///
/// Rejection happens before any handler runs.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verdict = match bearer_token(request.headers()) {
        None => Err(ApiError::Unauthorized {
            invalid_token: false,
        }),
        Some(token) if state.authenticator.verify(token) => Ok(()),
        Some(_) => Err(ApiError::Unauthorized {
            invalid_token: true,
        }),
    };

    match verdict {
        Ok(()) => Ok(next.run(request).await),
        Err(err) => {
            match &err {
                ApiError::Unauthorized {
                    invalid_token: true,
                } => warn!(method = %request.method(), path = %request.uri().path(), "rejected bearer token"),
                _ => debug!(method = %request.method(), path = %request.uri().path(), "missing bearer token"),
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer  abc ")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
