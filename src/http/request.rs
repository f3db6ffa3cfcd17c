//! Per-request context handed to handlers.
//!
//! # Responsibilities
//! - Parse the request target against a fixed base URL
//! - Carry method, URL, query, route params, body, identity and correlation ID
//! - Typed access helpers for handlers
//!
//! # Design Decisions
//! - Built fresh for every request, owned by that request alone
//! - Query values come from form-urlencoded decoding (last duplicate wins)
//! - `path` is the path that actually matched (after any `/api` strip)

use axum::http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

use crate::http::body::{Payload, RequestBody};
use crate::security::Identity;

/// Base used to resolve origin-form request targets.
pub const URL_BASE: &str = "http://localhost";

/// Request target could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid URL")]
pub struct UrlError(#[from] url::ParseError);

/// Resolve a raw request target (`/rides?open=1`) against [`URL_BASE`].
pub fn parse_request_url(target: &str) -> Result<Url, UrlError> {
    let base = Url::parse(URL_BASE)?;
    Ok(base.join(target)?)
}

/// Everything a handler gets to see about a request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub url: Url,
    pub path: String,
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
    pub params: HashMap<String, String>,
    pub raw_body: String,
    pub body: Payload,
    pub identity: Option<Identity>,
    pub correlation_id: String,
}

impl RequestContext {
    /// A context with no params, body, headers or identity.
    pub fn new(method: Method, url: Url, correlation_id: String) -> Self {
        let query = url.query_pairs().into_owned().collect();
        Self {
            method,
            path: url.path().to_string(),
            url,
            headers: HeaderMap::new(),
            query,
            params: HashMap::new(),
            raw_body: String::new(),
            body: Payload::Absent,
            identity: None,
            correlation_id,
        }
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.raw_body = body.raw;
        self.body = body.payload;
        self
    }

    pub fn with_identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Deserialize the JSON body into `T`. An absent body reads as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.body {
            Payload::Json(value) => T::deserialize(value),
            Payload::Absent => serde_json::from_value(Value::Null),
            Payload::Text(raw) => serde_json::from_str(raw),
        }
    }
}
