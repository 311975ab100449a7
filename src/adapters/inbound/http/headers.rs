//! Conversions between HTTP headers and object metadata.

use http::{HeaderMap, HeaderName, HeaderValue, header};
use tracing::warn;

use crate::domain::models::{GetRequest, HttpMetadata, ObjectMeta};

/// Collect the raw range and conditional headers of a read
pub fn get_request(headers: &HeaderMap) -> GetRequest {
    GetRequest {
        range: text(headers, header::RANGE),
        if_match: text(headers, header::IF_MATCH),
        if_none_match: text(headers, header::IF_NONE_MATCH),
        if_modified_since: text(headers, header::IF_MODIFIED_SINCE),
        if_unmodified_since: text(headers, header::IF_UNMODIFIED_SINCE),
    }
}

/// HTTP metadata an upload asks to store with the object
pub fn http_metadata(headers: &HeaderMap) -> HttpMetadata {
    HttpMetadata {
        content_type: text(headers, header::CONTENT_TYPE),
        content_language: text(headers, header::CONTENT_LANGUAGE),
        content_disposition: text(headers, header::CONTENT_DISPOSITION),
        content_encoding: text(headers, header::CONTENT_ENCODING),
        cache_control: text(headers, header::CACHE_CONTROL),
    }
}

/// Response headers describing an object: its stored HTTP metadata, `etag`,
/// `last-modified` and `accept-ranges: bytes`.
pub fn object_headers(meta: &ObjectMeta) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let metadata = &meta.http_metadata;
    let fields = [
        (header::CONTENT_TYPE, &metadata.content_type),
        (header::CONTENT_LANGUAGE, &metadata.content_language),
        (header::CONTENT_DISPOSITION, &metadata.content_disposition),
        (header::CONTENT_ENCODING, &metadata.content_encoding),
        (header::CACHE_CONTROL, &metadata.cache_control),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            insert(&mut headers, name, value);
        }
    }

    insert(&mut headers, header::ETAG, &meta.http_etag());
    if let Some(last_modified) = meta.last_modified {
        let value = last_modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        insert(&mut headers, header::LAST_MODIFIED, &value);
    }
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    headers
}

fn text(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => warn!(header = %name, "skipping stored metadata that is not a valid header value"),
    }
}
