use crate::domain::value_objects::{ObjectKey, UploadId};

/// Errors that can occur during storage operations
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Object not found
    ObjectNotFound { key: ObjectKey },

    /// The store does not know the multipart upload
    UploadNotFound { key: ObjectKey, upload_id: UploadId },

    /// Part number the store cannot address
    InvalidPartNumber { part_number: u32 },

    /// Part list handed to completion does not describe a complete upload
    InvalidPartList { message: String },

    /// Reading the inbound request body failed, usually a dropped client
    BodyStream { message: String },

    /// The request body grew past the configured size limit
    BodyTooLarge,

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl StorageError {
    pub fn infrastructure(message: impl Into<String>, source: impl ToString) -> Self {
        StorageError::InfrastructureError {
            message: message.into(),
            source: Some(source.to_string()),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::ObjectNotFound { key } => {
                write!(f, "Object not found: {}", key)
            }
            StorageError::UploadNotFound { key, upload_id } => {
                write!(
                    f,
                    "Multipart upload '{}' not found for object: {}",
                    upload_id, key
                )
            }
            StorageError::InvalidPartNumber { part_number } => {
                write!(f, "Invalid part number: {}", part_number)
            }
            StorageError::InvalidPartList { message } => {
                write!(f, "Invalid part list: {}", message)
            }
            StorageError::BodyStream { message } => {
                write!(f, "Failed to read request body: {}", message)
            }
            StorageError::BodyTooLarge => write!(f, "Request body exceeds the size limit"),
            StorageError::InfrastructureError { message, source } => match source {
                Some(source) => write!(f, "Infrastructure error: {}: {}", message, source),
                None => write!(f, "Infrastructure error: {}", message),
            },
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
