//! Route table and lookup.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Look up the first route matching method + path
//! - Decode captured parameters
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards (shared via Arc, no locks)
//! - O(n) scan in registration order: first match wins, no specificity ranking
//! - Registration order is the caller's responsibility: register `/items/special`
//!   before `/items/:id` if the literal route must win
//! - Explicit `None` on no match rather than a silent default

use axum::http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use super::handler::Handler;
use super::matcher::{PathMatcher, PatternError};

/// A registered route.
pub struct Route {
    pub method: Method,
    pub pattern: String,
    matcher: PathMatcher,
    handler: Arc<dyn Handler>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Result of a successful lookup.
#[derive(Clone)]
pub struct RouteMatch {
    pub handler: Arc<dyn Handler>,
    pub params: HashMap<String, String>,
}

/// Ordered route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` and path `pattern`.
    /// Extension methods are upper-cased: `get` registers as `GET`.
    pub fn route<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, PatternError> {
        let matcher = PathMatcher::compile(pattern)?;
        let method = normalize_method(method);
        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            matcher,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError> {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError> {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError> {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, PatternError> {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Find the first route registered for `method` whose pattern matches `path`.
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let method = normalize_method(method.clone());
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                let captures = route.matcher.captures(path)?;
                let params = route
                    .matcher
                    .param_names()
                    .iter()
                    .cloned()
                    .zip(captures.into_iter().map(decode_param))
                    .collect();
                Some(RouteMatch {
                    handler: route.handler.clone(),
                    params,
                })
            })
    }

    /// Registered routes, in lookup order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Upper-case a method. Standard methods are returned as-is.
fn normalize_method(method: Method) -> Method {
    let upper = method.as_str().to_ascii_uppercase();
    if upper == method.as_str() {
        return method;
    }
    Method::from_bytes(upper.as_bytes()).unwrap_or(method)
}

/// Percent-decode a captured segment; undecodable input becomes "".
fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_default()
}
