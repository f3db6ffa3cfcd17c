//! Request body reading with a byte ceiling.
//!
//! # Responsibilities
//! - Skip the body entirely for GET/HEAD
//! - Reject early on a declared `Content-Length` above the limit
//! - Stream chunks, failing as soon as the running total exceeds the limit
//! - Parse JSON when the content type says so, keep raw text otherwise
//!
//! # Design Decisions
//! - All-or-nothing: either a complete `RequestBody` or exactly one error
//! - Oversized and malformed bodies are distinct errors
//! - Bytes are decoded lossily as UTF-8

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, Method, StatusCode,
    },
};
use futures_util::StreamExt;
use serde_json::Value;
use thiserror::Error;

/// Default request body ceiling (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Parsed request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// GET/HEAD, or an empty body.
    #[default]
    Absent,
    /// Non-JSON content type; raw text verbatim.
    Text(String),
    /// `application/json` body.
    Json(Value),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Payload::Absent)
    }
}

/// Raw and parsed forms of a request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    pub raw: String,
    pub payload: Payload,
}

/// Body read failure.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("Payload too large")]
    PayloadTooLarge { limit: usize },

    #[error("Invalid JSON body")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to read request body")]
    Interrupted(#[source] axum::Error),
}

impl BodyError {
    /// Status code surfaced to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            BodyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BodyError::InvalidJson(_) | BodyError::Interrupted(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Read and parse a request body, enforcing `limit` bytes.
pub async fn read_body(
    method: &Method,
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> Result<RequestBody, BodyError> {
    if method == Method::GET || method == Method::HEAD {
        return Ok(RequestBody::default());
    }

    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit as u64) {
        return Err(BodyError::PayloadTooLarge { limit });
    }

    let mut buf = Vec::new();
    let mut stream = body.into_data_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Interrupted)?;
        if buf.len() + chunk.len() > limit {
            return Err(BodyError::PayloadTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    if buf.is_empty() {
        return Ok(RequestBody::default());
    }

    let raw = String::from_utf8_lossy(&buf).into_owned();
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let payload = if is_json {
        Payload::Json(serde_json::from_str(&raw).map_err(BodyError::InvalidJson)?)
    } else {
        Payload::Text(raw.clone())
    };

    Ok(RequestBody { raw, payload })
}
