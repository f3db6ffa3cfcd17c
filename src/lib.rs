//! Midway: a minimal path-routed JSON API server library

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ServerConfig;
pub use http::{HttpServer, Reply, RequestContext};
pub use lifecycle::Shutdown;
pub use routing::{HandlerResult, Router};
