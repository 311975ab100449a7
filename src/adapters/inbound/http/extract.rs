use axum::{
    body::{Body, HttpBody},
    extract::{FromRequest, Request},
    http::header,
};
use futures::{StreamExt, TryStreamExt};
use http_body_util::LengthLimitError;
use std::{convert::Infallible, error::Error as StdError};

use crate::domain::{errors::StorageError, models::ByteStream};

/// The request body, if the request has one.
///
/// A body counts as present when the request declares one through
/// `Content-Length` or `Transfer-Encoding`, or when data is already attached.
/// A declared zero-length body is present; a request without any is not.
pub struct RequestBody(pub Option<Body>);

impl<S> FromRequest<S> for RequestBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let declared = req.headers().contains_key(header::CONTENT_LENGTH)
            || req.headers().contains_key(header::TRANSFER_ENCODING);
        let body = req.into_body();

        if declared || !body.is_end_stream() {
            Ok(Self(Some(body)))
        } else {
            Ok(Self(None))
        }
    }
}

/// Stream a request body to the store without buffering it
pub fn body_stream(body: Body) -> ByteStream {
    body.into_data_stream()
        .map_err(|e| {
            if exceeds_limit(&e) {
                StorageError::BodyTooLarge
            } else {
                StorageError::BodyStream {
                    message: e.to_string(),
                }
            }
        })
        .boxed()
}

/// Whether a body error came from a request body size limit
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    async fn extract(request: Request) -> Option<Body> {
        let RequestBody(body) = RequestBody::from_request(request, &()).await.unwrap();
        body
    }

    #[tokio::test]
    async fn test_no_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/upload/x")
            .body(Body::empty())
            .unwrap();
        assert!(extract(request).await.is_none());
    }

    #[tokio::test]
    async fn test_declared_empty_body_is_present() {
        let request = Request::builder()
            .method("POST")
            .uri("/upload/x")
            .header(header::CONTENT_LENGTH, "0")
            .body(Body::empty())
            .unwrap();
        assert!(extract(request).await.is_some());
    }

    #[tokio::test]
    async fn test_body_with_data() {
        let request = Request::builder()
            .method("POST")
            .uri("/upload/x")
            .body(Body::from("data"))
            .unwrap();
        let body = extract(request).await.unwrap();

        let chunks: Vec<Bytes> = body_stream(body).try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"data");
    }

    #[tokio::test]
    async fn test_limited_body_reports_too_large() {
        let body = Body::new(http_body_util::Limited::new(Body::from("too long"), 3));

        let result: Result<Vec<Bytes>, _> = body_stream(body).try_collect().await;
        assert!(matches!(result, Err(StorageError::BodyTooLarge)));
    }
}
