//! Set-Cookie parsing for the dispatcher exchange
//!
//! The dispatcher answers with several `Set-Cookie` headers, some of which
//! arrive folded into a single comma-separated header value. Only the
//! leading `name=value` pair of each cookie matters here; attributes such
//! as `Path` or `HttpOnly` are dropped.

use reqwest::header::{HeaderMap, SET_COOKIE};

/// Cookie attribute names that must not be mistaken for cookie pairs when
/// splitting a folded header on commas.
const ATTRIBUTE_NAMES: &[&str] = &[
    "path", "domain", "expires", "max-age", "secure", "httponly", "samesite",
];

fn is_attribute(name: &str) -> bool {
    ATTRIBUTE_NAMES
        .iter()
        .any(|attr| name.eq_ignore_ascii_case(attr))
}

/// Parse one `Set-Cookie` header value into `(name, value)` pairs.
///
/// Handles folded headers where several cookies are joined with commas.
/// Attribute tokens are skipped; insertion order is preserved.
pub fn parse_set_cookie(header: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for segment in header.split(',') {
        let lead = segment.split(';').next().unwrap_or("").trim();
        let Some((name, value)) = lead.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || is_attribute(name) {
            continue;
        }
        pairs.push((name.to_string(), value.trim().to_string()));
    }
    pairs
}

/// Collect every cookie from the response headers into a single
/// `Cookie`-header string (`name=value; name=value; ...`).
///
/// The first occurrence of each cookie name wins; order of first
/// appearance is preserved. Returns an empty string when no cookies were
/// set.
pub fn collect_cookie_header(headers: &HeaderMap) -> String {
    let mut seen: Vec<(String, String)> = Vec::new();
    for header in headers.get_all(SET_COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for (name, value) in parse_set_cookie(raw) {
            if !seen.iter().any(|(n, _)| *n == name) {
                seen.push((name, value));
            }
        }
    }
    seen.iter()
        .map(|(n, v)| format!("{n}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Look up a single cookie's value inside a `Cookie`-header string.
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (n, v) = pair.trim().split_once('=')?;
        (n == name).then_some(v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_folded_header() {
        let pairs = parse_set_cookie("a=1; Path=/, b=2; HttpOnly");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_skips_attribute_tokens() {
        let pairs = parse_set_cookie(
            "wt2=abc; Path=/; Domain=.zhipin.com; Expires=Wed, 01 Jan 2025 00:00:00 GMT; HttpOnly",
        );
        // The Expires date contains a comma; the date remainder has no '='
        // lead pair and must not leak through.
        assert_eq!(pairs, vec![("wt2".to_string(), "abc".to_string())]);
    }

    #[test]
    fn test_collect_preserves_order_and_dedupes() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("wt2=abc; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("bst=xyz; HttpOnly"));
        headers.append(SET_COOKIE, HeaderValue::from_static("wt2=other"));
        assert_eq!(collect_cookie_header(&headers), "wt2=abc; bst=xyz");
    }

    #[test]
    fn test_collect_empty_headers() {
        assert_eq!(collect_cookie_header(&HeaderMap::new()), "");
    }

    #[test]
    fn test_cookie_value_lookup() {
        let header = "wt2=abc; bst=xyz; geek=1";
        assert_eq!(cookie_value(header, "bst"), Some("xyz"));
        assert_eq!(cookie_value(header, "missing"), None);
    }
}
