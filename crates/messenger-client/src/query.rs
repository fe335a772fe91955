//! Query string and path helpers.

use chrono::{DateTime, Utc};

/// Build `?k=v&k2=v2` from ordered pairs, percent-encoding both sides.
///
/// Returns an empty string when there are no pairs.
pub fn to_query_string<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .enumerate()
        .map(|(i, (k, v))| {
            format!(
                "{}{}={}",
                if i == 0 { '?' } else { '&' },
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect()
}

/// Format a timestamp the way the API expects date filters.
pub fn format_timestamp(date: &DateTime<Utc>) -> String {
    format!("{}Z+00:00", date.format("%Y-%m-%dT%H:%M:%S"))
}

/// Percent-encode a single path segment.
///
/// `.` and `..` pass through unchanged; [`is_dot_segment`] catches them
/// before a path is joined onto the base URL.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// True for segments URL resolution treats as `.` or `..`, including their
/// percent-encoded spellings.
pub fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_query_string_order_and_encoding() {
        let query = to_query_string(&[
            ("start_date", "2024-01-01T00:00:00Z+00:00"),
            ("headers", "false"),
        ]);
        assert_eq!(
            query,
            "?start_date=2024-01-01T00%3A00%3A00Z%2B00%3A00&headers=false"
        );
    }

    #[test]
    fn test_empty_query_string() {
        let pairs: [(&str, &str); 0] = [];
        assert_eq!(to_query_string(&pairs), "");
    }

    #[test]
    fn test_format_timestamp() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(&date), "2024-03-09T07:05:01Z+00:00");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("abc-123"), "abc-123");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_dot_segments() {
        for segment in [".", "..", "%2E", "%2e%2E", ".%2e", "%2E."] {
            assert!(is_dot_segment(segment), "{segment}");
        }
        for segment in ["...", "v1.2", ".hidden", "%252e", ""] {
            assert!(!is_dot_segment(segment), "{segment}");
        }
        // Encoding keeps a dot id a dot segment
        assert!(is_dot_segment(&encode_segment("..")));
    }
}
