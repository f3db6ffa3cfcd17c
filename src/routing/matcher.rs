//! Path pattern compilation.
//!
//! # Responsibilities
//! - Turn a path template (`/rides/:id/queue`) into an anchored regex
//! - Record parameter names in capture order
//! - Reject malformed templates at registration time
//!
//! # Design Decisions
//! - Empty segments are discarded, so leading/trailing slashes are tolerated
//! - Literal segments are regex-escaped (`file.json` only matches `file.json`)
//! - A `:name` segment matches one or more non-`/` characters
//! - No optional segments, no wildcards
//! - Compilation is pure: same pattern always yields the same matcher

use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

/// Route registration failure. Fatal at startup, never raised per request.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("route pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    #[error("route pattern `{0}` contains an empty parameter name")]
    EmptyParam(String),

    #[error("route pattern `{pattern}` repeats parameter `{name}`")]
    DuplicateParam { pattern: String, name: String },

    #[error("route pattern `{pattern}` failed to compile: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    regex: Regex,
    param_names: Vec<String>,
}

impl PathMatcher {
    /// Compile a path template with `:name` segments.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        }

        let mut param_names = Vec::new();
        let mut seen = HashSet::new();
        let mut parts = Vec::new();

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some("") => return Err(PatternError::EmptyParam(pattern.to_string())),
                Some(name) => {
                    if !seen.insert(name) {
                        return Err(PatternError::DuplicateParam {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                    param_names.push(name.to_string());
                    parts.push("([^/]+)".to_string());
                }
                None => parts.push(regex::escape(segment)),
            }
        }

        let source = format!("^/{}$", parts.join("/"));
        let regex = Regex::new(&source).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self { regex, param_names })
    }

    /// Parameter names in capture order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Raw (still percent-encoded) captures for `path`, one per parameter.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str()).unwrap_or_default())
                .collect(),
        )
    }

    /// Returns true if `path` matches this template exactly.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_params() {
        let matcher = PathMatcher::compile("/mount/:a/:b").unwrap();
        assert_eq!(matcher.param_names(), &["a", "b"]);
        assert_eq!(matcher.captures("/mount/x/y"), Some(vec!["x", "y"]));
        assert_eq!(matcher.captures("/mount/x"), None);
        assert_eq!(matcher.captures("/mount/x/y/z"), None);
    }

    #[test]
    fn test_literal_segments_are_escaped() {
        let matcher = PathMatcher::compile("/static/file.json").unwrap();
        assert!(matcher.is_match("/static/file.json"));
        assert!(!matcher.is_match("/static/fileXjson"));
    }

    #[test]
    fn test_slashes_tolerated_in_template() {
        let matcher = PathMatcher::compile("//rides/:id/").unwrap();
        assert!(matcher.is_match("/rides/7"));
        assert!(!matcher.is_match("/rides/7/"));
    }

    #[test]
    fn test_root_pattern() {
        let matcher = PathMatcher::compile("/").unwrap();
        assert!(matcher.is_match("/"));
        assert!(!matcher.is_match("/rides"));
        assert!(matcher.param_names().is_empty());
    }

    #[test]
    fn test_param_never_spans_segments() {
        let matcher = PathMatcher::compile("/files/:name").unwrap();
        assert!(!matcher.is_match("/files/a/b"));
        assert!(!matcher.is_match("/files/"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            PathMatcher::compile("rides"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            PathMatcher::compile("/rides/:"),
            Err(PatternError::EmptyParam(_))
        ));
        assert!(matches!(
            PathMatcher::compile("/rides/:id/seats/:id"),
            Err(PatternError::DuplicateParam { name, .. }) if name == "id"
        ));
    }
}
