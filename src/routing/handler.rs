//! Request handler abstraction.
//!
//! A handler is anything with a single `call(context) -> future of reply`
//! capability. Plain `async fn(RequestContext) -> HandlerResult` items and
//! closures qualify through the blanket impl; authorization wrappers are
//! handlers that hold another handler.

use futures_util::future::BoxFuture;
use std::future::Future;

use crate::http::{Reply, RequestContext};

/// Error returned by a failing handler. Logged, never shown to the client.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a handler invocation.
pub type HandlerResult = Result<Reply, HandlerError>;

/// A route handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(ctx))
    }
}
