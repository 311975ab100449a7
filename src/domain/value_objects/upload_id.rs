use crate::domain::errors::ValidationError;

/// Identifier the store assigns to a multipart upload.
///
/// The value is opaque to the gateway; it is only carried between the client
/// and the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadId(String);

impl UploadId {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyUploadId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_id() {
        assert_eq!(UploadId::new("42").unwrap().as_str(), "42");
        assert_eq!(UploadId::new(""), Err(ValidationError::EmptyUploadId));
    }
}
