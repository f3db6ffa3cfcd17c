//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, single fallback into the dispatcher)
//!     → request.rs (URL parse, RequestContext)
//!     → body.rs (bounded read, JSON parse)
//!     → [routing table picks a handler]
//!     → response.rs (Reply → status + JSON)
//!     → Send to client
//! ```

pub mod body;
pub mod request;
pub mod response;
pub mod server;

pub use body::{read_body, BodyError, Payload, RequestBody};
pub use request::{parse_request_url, RequestContext, UrlError};
pub use response::Reply;
pub use server::{Dispatcher, HttpServer};
