use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::domain::{errors::StorageResult, value_objects::ObjectKey};

/// A stream of object bytes flowing to or from the store
pub type ByteStream = BoxStream<'static, StorageResult<Bytes>>;

/// Standard HTTP metadata stored alongside an object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpMetadata {
    pub content_type: Option<String>,
    pub content_language: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
}

/// Snapshot of an object's state as reported by the store
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMeta {
    pub key: ObjectKey,
    pub size: u64,
    pub etag: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub http_metadata: HttpMetadata,
}

impl ObjectMeta {
    /// The entity tag in its quoted HTTP form
    pub fn http_etag(&self) -> String {
        let etag = self.etag.as_str();
        if etag.starts_with('"') || etag.starts_with("W/\"") {
            etag.to_string()
        } else {
            format!("\"{}\"", etag)
        }
    }
}

/// Raw range and conditional header values of a read.
///
/// The values are passed through untouched; evaluating them is the store's
/// job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetRequest {
    pub range: Option<String>,
    pub if_match: Option<String>,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub if_unmodified_since: Option<String>,
}

impl GetRequest {
    /// Whether the caller asked for a byte range
    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    pub fn is_conditional(&self) -> bool {
        self.if_match.is_some()
            || self.if_none_match.is_some()
            || self.if_modified_since.is_some()
            || self.if_unmodified_since.is_some()
    }
}

/// Byte range the store resolved for a partial read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: u64,
    /// Inclusive end; `None` means the last byte of the object
    pub end: Option<u64>,
}

impl ByteRange {
    pub fn new(offset: u64, end: Option<u64>) -> Self {
        Self { offset, end }
    }

    /// Value of the `Content-Range` header for an object of `size` bytes
    pub fn content_range(&self, size: u64) -> String {
        let end = self.end.unwrap_or_else(|| size.saturating_sub(1));
        format!("bytes {}-{}/{}", self.offset, end, size)
    }
}

/// Result of evaluating a read against the store
pub enum GetOutcome {
    NotFound,
    /// Conditional evaluation left the object unchanged; metadata only
    NotModified(ObjectMeta),
    Partial {
        meta: ObjectMeta,
        range: ByteRange,
        body: ByteStream,
    },
    Full {
        meta: ObjectMeta,
        body: ByteStream,
    },
}

impl std::fmt::Debug for GetOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetOutcome::NotFound => write!(f, "NotFound"),
            GetOutcome::NotModified(meta) => f.debug_tuple("NotModified").field(meta).finish(),
            GetOutcome::Partial { meta, range, .. } => f
                .debug_struct("Partial")
                .field("meta", meta)
                .field("range", range)
                .finish_non_exhaustive(),
            GetOutcome::Full { meta, .. } => f
                .debug_struct("Full")
                .field("meta", meta)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(etag: &str) -> ObjectMeta {
        ObjectMeta {
            key: ObjectKey::new("a.txt").unwrap(),
            size: 10,
            etag: etag.to_string(),
            last_modified: None,
            http_metadata: HttpMetadata::default(),
        }
    }

    #[test]
    fn test_content_range_with_explicit_end() {
        assert_eq!(ByteRange::new(0, Some(3)).content_range(10), "bytes 0-3/10");
    }

    #[test]
    fn test_content_range_defaults_end_to_last_byte() {
        assert_eq!(ByteRange::new(4, None).content_range(10), "bytes 4-9/10");
    }

    #[test]
    fn test_http_etag_quoting() {
        assert_eq!(meta("abc").http_etag(), "\"abc\"");
        assert_eq!(meta("\"abc\"").http_etag(), "\"abc\"");
        assert_eq!(meta("W/\"abc\"").http_etag(), "W/\"abc\"");
    }

    #[test]
    fn test_get_request_flags() {
        let plain = GetRequest::default();
        assert!(!plain.has_range());
        assert!(!plain.is_conditional());

        let request = GetRequest {
            range: Some("bytes=0-3".to_string()),
            if_none_match: Some("\"1\"".to_string()),
            ..Default::default()
        };
        assert!(request.has_range());
        assert!(request.is_conditional());
    }
}
