use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;
use tracing::error;

use crate::domain::errors::{StorageError, ValidationError};

const REALM: &str = "object-gateway";

/// Errors surfaced by the HTTP handlers
#[derive(ThisError, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized { invalid_token: bool },

    #[error("not found")]
    NotFound,

    #[error("Empty body")]
    EmptyBody,

    #[error("missing_part_number")]
    MissingPartNumber,

    #[error("invalid_part_number")]
    InvalidPartNumber,

    #[error("missing_body")]
    MissingBody,

    #[error("missing_parts")]
    MissingParts,

    #[error("invalid_parts: {0}")]
    InvalidParts(String),

    #[error("invalid_key: {0}")]
    InvalidKey(ValidationError),

    #[error("invalid_upload_id: {0}")]
    InvalidUploadId(ValidationError),

    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl From<&ApiError> for StatusCode {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmptyBody
            | ApiError::MissingPartNumber
            | ApiError::InvalidPartNumber
            | ApiError::MissingBody
            | ApiError::MissingParts
            | ApiError::InvalidParts(_)
            | ApiError::InvalidKey(_)
            | ApiError::InvalidUploadId(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(StorageError::BodyTooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let mut response = (status, self.to_string()).into_response();
        if let ApiError::Unauthorized { invalid_token } = self {
            let challenge = if invalid_token {
                format!("Bearer realm=\"{}\", error=\"invalid_token\"", REALM)
            } else {
                format!("Bearer realm=\"{}\"", REALM)
            };
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}
