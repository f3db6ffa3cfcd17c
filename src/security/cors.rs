//! CORS header negotiation.
//!
//! # Responsibilities
//! - Build the origin allow-list once from configuration
//! - Pick `Access-Control-Allow-Origin` per request
//! - Emit the fixed credentials/headers/methods set on every response
//!
//! # Design Decisions
//! - No configured origins means any origin, answered with `*`
//! - Origins compare by scheme+host+port, so `https://a.example/` equals `https://a.example`
//! - A non-matching origin gets `*` if listed, else the first configured origin

use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
        ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    },
    HeaderMap, HeaderValue,
};
use url::Url;

const WILDCARD: &str = "*";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// Reduce an origin-ish string to `scheme://host[:port]`.
pub fn normalize_origin(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed == WILDCARD {
        return WILDCARD.to_string();
    }
    match Url::parse(trimmed) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(_) => trimmed.trim_end_matches('/').to_string(),
    }
}

/// Cross-origin policy, immutable after startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsPolicy {
    /// `None` allows any origin.
    allowed: Option<Vec<String>>,
}

impl CorsPolicy {
    /// Build from a comma-separated list; empty or absent allows any origin.
    pub fn from_config(origins: Option<&str>) -> Self {
        let allowed: Vec<String> = origins
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(normalize_origin)
            .collect();

        Self {
            allowed: (!allowed.is_empty()).then_some(allowed),
        }
    }

    pub fn allow_any() -> Self {
        Self::default()
    }

    pub fn allowed_origins(&self) -> Option<&[String]> {
        self.allowed.as_deref()
    }

    /// Value for `Access-Control-Allow-Origin` given the request's `Origin`.
    pub fn allow_origin(&self, origin: Option<&str>) -> String {
        let Some(allowed) = &self.allowed else {
            return WILDCARD.to_string();
        };

        if let Some(raw) = origin {
            let normalized = normalize_origin(raw);
            if allowed.contains(&normalized) {
                return raw.to_string();
            }
        }

        if allowed.iter().any(|o| o == WILDCARD) {
            return WILDCARD.to_string();
        }

        // from_config never builds an empty list
        allowed.first().cloned().unwrap_or_else(|| WILDCARD.to_string())
    }

    /// Full CORS header set for a request with the given `Origin`.
    pub fn headers(&self, origin: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let allow_origin = HeaderValue::try_from(self.allow_origin(origin))
            .unwrap_or_else(|_| HeaderValue::from_static(WILDCARD));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_origin() {
        assert_eq!(normalize_origin("https://a.example/"), "https://a.example");
        assert_eq!(normalize_origin(" https://a.example:8443/path?q=1 "), "https://a.example:8443");
        assert_eq!(normalize_origin("https://a.example:443"), "https://a.example");
        assert_eq!(normalize_origin("*"), "*");
        assert_eq!(normalize_origin("not a url//"), "not a url");
    }

    #[test]
    fn test_unconfigured_allows_any() {
        let policy = CorsPolicy::from_config(None);
        assert_eq!(policy.allowed_origins(), None);
        assert_eq!(policy.allow_origin(Some("https://x.example")), "*");
        assert_eq!(policy.allow_origin(None), "*");

        assert_eq!(CorsPolicy::from_config(Some(" , ")), CorsPolicy::allow_any());
    }

    #[test]
    fn test_listed_origin_reflected_raw() {
        let policy = CorsPolicy::from_config(Some("https://a.example"));
        assert_eq!(policy.allow_origin(Some("https://a.example")), "https://a.example");
        // matched after normalization, answered with the value as sent
        assert_eq!(policy.allow_origin(Some("https://a.example/")), "https://a.example/");
    }

    #[test]
    fn test_unlisted_origin_gets_first_entry() {
        let policy = CorsPolicy::from_config(Some("https://a.example/, https://c.example"));
        assert_eq!(
            policy.allowed_origins(),
            Some(&["https://a.example".to_string(), "https://c.example".to_string()][..])
        );
        assert_eq!(policy.allow_origin(Some("https://b.example")), "https://a.example");
        assert_eq!(policy.allow_origin(None), "https://a.example");
    }

    #[test]
    fn test_unlisted_origin_with_wildcard_entry() {
        let policy = CorsPolicy::from_config(Some("https://a.example,*"));
        assert_eq!(policy.allow_origin(Some("https://b.example")), "*");
        assert_eq!(policy.allow_origin(Some("https://a.example")), "https://a.example");
    }

    #[test]
    fn test_header_set() {
        let headers = CorsPolicy::from_config(Some("https://a.example")).headers(Some("https://a.example"));
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://a.example");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Authorization");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET,POST,PUT,DELETE,OPTIONS");
    }
}
