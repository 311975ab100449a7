use crate::domain::errors::ValidationError;

const MAX_KEY_LEN: usize = 1024;

/// The name an object is stored under.
///
/// Keys are opaque and case-sensitive. Only values no store can hold
/// distinctly are rejected: the empty string, keys over 1024 bytes, keys
/// containing NUL, and keys with an empty `/`-separated segment (a leading,
/// trailing or doubled slash), which stores collapse onto another key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a new ObjectKey with validation
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ValidationError::EmptyObjectKey);
        }

        if value.len() > MAX_KEY_LEN {
            return Err(ValidationError::ObjectKeyTooLong {
                actual: value.len(),
                max: MAX_KEY_LEN,
            });
        }

        if value.contains('\0') {
            return Err(ValidationError::InvalidObjectKeyCharacter('\0'));
        }

        if value.split('/').any(str::is_empty) {
            return Err(ValidationError::EmptyObjectKeySegment);
        }

        Ok(Self(value))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_object_key() {
        assert!(ObjectKey::new("file.txt").is_ok());
        assert!(ObjectKey::new("Photo.JPG").is_ok());
        assert!(ObjectKey::new("with spaces and ünïcode").is_ok());
        assert!(ObjectKey::new("x".repeat(1024)).is_ok());
    }

    #[test]
    fn test_invalid_object_key() {
        assert_eq!(ObjectKey::new(""), Err(ValidationError::EmptyObjectKey));
        assert!(ObjectKey::new("null\0byte").is_err());
        assert_eq!(
            ObjectKey::new("x".repeat(1025)),
            Err(ValidationError::ObjectKeyTooLong {
                actual: 1025,
                max: 1024
            })
        );
    }

    #[test]
    fn test_empty_segments_rejected() {
        for key in ["/a", "a/", "//a/", "a//b", "/"] {
            assert_eq!(
                ObjectKey::new(key),
                Err(ValidationError::EmptyObjectKeySegment),
                "key {:?}",
                key
            );
        }
        assert!(ObjectKey::new("a/b/c.txt").is_ok());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let lower = ObjectKey::new("report.pdf").unwrap();
        let upper = ObjectKey::new("REPORT.pdf").unwrap();
        assert_ne!(lower, upper);
    }
}
