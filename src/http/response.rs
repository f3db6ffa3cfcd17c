//! Handler replies.
//!
//! # Responsibilities
//! - Explicit result type returned by every handler
//! - Convenience constructors for the common JSON shapes
//! - Conversion into an axum `Response`
//!
//! # Design Decisions
//! - Two variants only: 204 with no body, or a status plus JSON body
//! - Every error body is `{"error": "<message>"}`, nothing else leaks

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// What a handler wants sent back.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 204 with an empty body.
    NoContent,
    /// `status` with `body` serialized as JSON.
    Json { status: StatusCode, body: Value },
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Reply::Json { status, body }
    }

    /// 200 with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    /// 201 with a JSON body.
    pub fn created(body: Value) -> Self {
        Self::json(StatusCode::CREATED, body)
    }

    pub fn no_content() -> Self {
        Reply::NoContent
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }))
    }

    /// Serialize any value into a JSON reply.
    pub fn serialize<T: Serialize>(status: StatusCode, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::json(status, serde_json::to_value(value)?))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Reply::NoContent => StatusCode::NO_CONTENT,
            Reply::Json { status, .. } => *status,
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
            Reply::Json { status, body } => (status, Json(body)).into_response(),
        }
    }
}
