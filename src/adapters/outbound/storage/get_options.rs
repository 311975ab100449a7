//! Translation of raw read headers into `object_store::GetOptions`.

use chrono::{DateTime, Duration, Utc};
use object_store::{GetOptions, GetRange};

use crate::domain::models::GetRequest;

/// Build the store options for a read.
///
/// Header values that cannot be understood are dropped, so a malformed
/// `Range` reads the whole object and a malformed date applies no condition.
pub(crate) fn build_get_options(request: &GetRequest) -> (GetOptions, Option<GetRange>) {
    let range = request.range.as_deref().and_then(parse_range);

    let options = GetOptions {
        if_match: request.if_match.as_deref().map(normalize_etags),
        if_none_match: request.if_none_match.as_deref().map(normalize_etags),
        if_modified_since: request
            .if_modified_since
            .as_deref()
            .and_then(parse_http_date),
        if_unmodified_since: request
            .if_unmodified_since
            .as_deref()
            .and_then(parse_http_date),
        range: range.clone(),
        ..Default::default()
    };

    (options, range)
}

/// Parse a single `bytes=` range. Multi-range values are not served.
pub(crate) fn parse_range(value: &str) -> Option<GetRange> {
    let (unit, spec) = value.trim().split_once('=')?;
    if !unit.trim().eq_ignore_ascii_case("bytes") || spec.contains(',') {
        return None;
    }

    let (start, end) = spec.trim().split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    match (start.is_empty(), end.is_empty()) {
        (true, true) => None,
        (true, false) => match end.parse::<u64>().ok()? {
            0 => None,
            suffix => Some(GetRange::Suffix(suffix)),
        },
        (false, true) => Some(GetRange::Offset(start.parse().ok()?)),
        (false, false) => {
            let start: u64 = start.parse().ok()?;
            let end: u64 = end.parse().ok()?;
            if end < start {
                return None;
            }
            Some(GetRange::Bounded(start..end.checked_add(1)?))
        }
    }
}

/// Parse an HTTP date.
///
/// HTTP dates have second precision while stores keep sub-second
/// modification times, so the instant returned is the last nanosecond of the
/// named second.
pub(crate) fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc2822(value.trim()).ok()?;
    Some(parsed.with_timezone(&Utc) + Duration::nanoseconds(999_999_999))
}

/// Strip weak markers and quotes from an entity tag list.
fn normalize_etags(value: &str) -> String {
    value
        .split(',')
        .map(|tag| {
            let tag = tag.trim();
            let tag = tag.strip_prefix("W/").unwrap_or(tag);
            tag.strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(tag)
        })
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_bounded_range() {
        assert_eq!(parse_range("bytes=0-3"), Some(GetRange::Bounded(0..4)));
        assert_eq!(parse_range("Bytes = 5 - 9"), Some(GetRange::Bounded(5..10)));
    }

    #[test]
    fn test_parse_open_ranges() {
        assert_eq!(parse_range("bytes=10-"), Some(GetRange::Offset(10)));
        assert_eq!(parse_range("bytes=-4"), Some(GetRange::Suffix(4)));
    }

    #[test]
    fn test_unusable_ranges_are_ignored() {
        assert_eq!(parse_range("bytes=5-2"), None);
        assert_eq!(parse_range("bytes=-0"), None);
        assert_eq!(parse_range("bytes=-"), None);
        assert_eq!(parse_range("bytes=0-1,4-5"), None);
        assert_eq!(parse_range("items=0-1"), None);
        assert_eq!(parse_range("bytes=a-b"), None);
        assert_eq!(parse_range("garbage"), None);
    }

    #[test]
    fn test_parse_http_date_covers_whole_second() {
        let parsed = parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        let second = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
        assert!(parsed > second);
        assert!(parsed < second + Duration::seconds(1));
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_normalize_etags() {
        assert_eq!(normalize_etags("\"abc\""), "abc");
        assert_eq!(normalize_etags("W/\"abc\", \"def\""), "abc,def");
        assert_eq!(normalize_etags("*"), "*");
    }

    #[test]
    fn test_build_get_options() {
        let request = GetRequest {
            range: Some("bytes=0-3".to_string()),
            if_none_match: Some("\"7\"".to_string()),
            if_modified_since: Some("not a date".to_string()),
            ..Default::default()
        };
        let (options, range) = build_get_options(&request);

        assert_eq!(range, Some(GetRange::Bounded(0..4)));
        assert_eq!(options.range, Some(GetRange::Bounded(0..4)));
        assert_eq!(options.if_none_match.as_deref(), Some("7"));
        assert!(options.if_modified_since.is_none());
        assert!(options.if_match.is_none());
    }
}
