//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum service that funnels every request into the dispatcher
//! - Apply CORS headers to every response
//! - Short-circuit OPTIONS preflights
//! - Parse URL and body, resolve identity, match a route (with `/api` fallback)
//! - Invoke the handler and turn its outcome into exactly one response
//! - Log one access line per request with its correlation ID
//!
//! # Request Phases
//! ```text
//! CORS → OPTIONS? → URL → body → identity → route → context → handler → log
//!          │          │      │                 │                  │
//!         204        400   413/400            404            500 on error/panic
//! ```

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::http::body::read_body;
use crate::http::request::{parse_request_url, RequestContext};
use crate::http::response::Reply;
use crate::lifecycle::wait_for_shutdown;
use crate::observability::metrics;
use crate::routing::{RouteMatch, Router as RouteTable};
use crate::security::{CorsPolicy, Identity, IdentityResolver};

pub const NOT_FOUND: &str = "Not found";
pub const INTERNAL_ERROR: &str = "Internal server error.";
pub const REQUEST_TIMEOUT: &str = "Request timed out.";

/// Status logged for a request whose response was never produced.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Emits the access line and request metrics when dropped.
/// A request dropped before `status` is set is logged as 499 with `aborted`.
struct AccessLog {
    started: Instant,
    correlation_id: String,
    method: Method,
    url: String,
    status: Option<StatusCode>,
}

impl Drop for AccessLog {
    fn drop(&mut self) {
        let aborted = self.status.is_none();
        let status = self.status.map_or(CLIENT_CLOSED_REQUEST, |s| s.as_u16());
        tracing::info!(
            correlation_id = %self.correlation_id,
            method = %self.method,
            url = %self.url,
            status,
            aborted,
            duration_ms = self.started.elapsed().as_millis() as u64,
            "Request completed"
        );
        metrics::record_request(self.method.as_str(), status, self.started);
    }
}

/// Per-process dispatch state, shared read-only by every request.
pub struct Dispatcher {
    routes: RouteTable,
    cors: CorsPolicy,
    identity: Arc<dyn IdentityResolver>,
    body_limit: usize,
    request_timeout: Duration,
    api_prefix: String,
}

impl Dispatcher {
    pub fn new(config: &ServerConfig, routes: RouteTable, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            routes,
            cors: CorsPolicy::from_config(config.cors.allowed_origins.as_deref()),
            identity,
            body_limit: config.http.max_body_bytes,
            request_timeout: config.http.request_timeout(),
            api_prefix: config.http.api_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Run one request through every phase and produce its response.
    pub async fn handle(&self, request: Request) -> Response {
        let mut access = AccessLog {
            started: Instant::now(),
            correlation_id: Uuid::new_v4().to_string(),
            method: request.method().clone(),
            url: request.uri().to_string(),
            status: None,
        };
        let cors_headers = self.cors.headers(
            request
                .headers()
                .get(header::ORIGIN)
                .and_then(|v| v.to_str().ok()),
        );

        let mut response = if access.method == Method::OPTIONS {
            StatusCode::NO_CONTENT.into_response()
        } else {
            match tokio::time::timeout(self.request_timeout, self.process(request, &access.correlation_id)).await {
                Ok(response) => response,
                Err(_) => {
                    tracing::warn!(
                        correlation_id = %access.correlation_id,
                        timeout_secs = self.request_timeout.as_secs(),
                        "Request deadline exceeded"
                    );
                    Reply::error(StatusCode::REQUEST_TIMEOUT, REQUEST_TIMEOUT).into_response()
                }
            }
        };
        response.headers_mut().extend(cors_headers);
        access.status = Some(response.status());

        response
    }

    async fn process(&self, request: Request, correlation_id: &str) -> Response {
        let (parts, body) = request.into_parts();

        let url = match parse_request_url(&parts.uri.to_string()) {
            Ok(url) => url,
            Err(e) => return Reply::error(StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };

        let body = match read_body(&parts.method, &parts.headers, body, self.body_limit).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(correlation_id = %correlation_id, error = ?e, "Rejected request body");
                return Reply::error(e.status(), e.to_string()).into_response();
            }
        };

        let identity = self.resolve_identity(&parts.headers, correlation_id).await;

        let Some((found, path)) = self.find_route(&parts.method, url.path()) else {
            return Reply::error(StatusCode::NOT_FOUND, NOT_FOUND).into_response();
        };

        let mut ctx = RequestContext::new(parts.method, url, correlation_id.to_string())
            .with_body(body)
            .with_identity(identity);
        ctx.path = path;
        ctx.headers = parts.headers;
        ctx.params = found.params;

        // Runs to completion even if the client goes away.
        let handler = found.handler;
        let outcome = tokio::spawn(async move { handler.call(ctx).await }).await;

        match outcome {
            Ok(Ok(reply)) => reply.into_response(),
            Ok(Err(e)) => {
                tracing::error!(correlation_id = %correlation_id, error = %e, "Handler failed");
                metrics::record_handler_failure();
                Reply::error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
            }
            Err(join_error) => {
                let detail = if join_error.is_panic() {
                    panic_message(join_error.into_panic())
                } else {
                    join_error.to_string()
                };
                tracing::error!(correlation_id = %correlation_id, panic = %detail, "Handler panicked");
                metrics::record_handler_failure();
                Reply::error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
            }
        }
    }

    /// Identity for the request; lookup errors mean "unauthenticated".
    async fn resolve_identity(&self, headers: &HeaderMap, correlation_id: &str) -> Option<Identity> {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        match self.identity.resolve(authorization).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(correlation_id = %correlation_id, error = %e, "Identity resolution failed");
                metrics::record_identity_failure();
                None
            }
        }
    }

    /// Match as sent, then retry with the API prefix stripped.
    /// Returns the match and the path that produced it.
    fn find_route(&self, method: &Method, path: &str) -> Option<(RouteMatch, String)> {
        if let Some(found) = self.routes.find(method, path) {
            return Some((found, path.to_string()));
        }

        let stripped = path
            .strip_prefix(self.api_prefix.as_str())
            .filter(|rest| rest.starts_with('/'))?;
        self.routes
            .find(method, stripped)
            .map(|found| (found, stripped.to_string()))
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default()
}

async fn dispatch(State(dispatcher): State<Arc<Dispatcher>>, request: Request) -> Response {
    dispatcher.handle(request).await
}

/// HTTP server for the dispatch core.
pub struct HttpServer {
    dispatcher: Arc<Dispatcher>,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server from a fully registered route table.
    pub fn new(config: ServerConfig, routes: RouteTable, identity: Arc<dyn IdentityResolver>) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(&config, routes, identity));
        Self { dispatcher, config }
    }

    /// The Axum service: a single fallback that hands everything to the dispatcher.
    pub fn app(&self) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch)
            .with_state(self.dispatcher.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until shutdown is triggered or the process is signalled.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.dispatcher.routes().len(),
            max_body_bytes = self.config.http.max_body_bytes,
            "HTTP server starting"
        );

        axum::serve(listener, self.app())
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
