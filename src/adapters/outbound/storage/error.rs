use crate::domain::{errors::StorageError, value_objects::ObjectKey};

/// Convert object_store errors to domain storage errors
impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { ref path, .. } => match ObjectKey::new(path.as_str()) {
                Ok(key) => StorageError::ObjectNotFound { key },
                Err(_) => StorageError::infrastructure("Object not found", &err),
            },
            object_store::Error::Precondition { .. } => {
                StorageError::infrastructure("Precondition failed", &err)
            }
            object_store::Error::NotModified { .. } => {
                StorageError::infrastructure("Object not modified", &err)
            }
            object_store::Error::NotSupported { .. } | object_store::Error::NotImplemented => {
                StorageError::infrastructure("Operation not supported by store", &err)
            }
            _ => StorageError::infrastructure("Object store operation failed", &err),
        }
    }
}
