//! Authorization wrappers.
//! Gate a handler on the identity resolved for the request.

use axum::http::StatusCode;
use futures_util::future::{self, BoxFuture};
use std::sync::Arc;

use crate::http::{Reply, RequestContext};
use crate::routing::{Handler, HandlerResult};

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required.";
pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions.";

fn reject(status: StatusCode, message: &str) -> BoxFuture<'static, HandlerResult> {
    Box::pin(future::ready(Ok(Reply::error(status, message))))
}

/// Handler that answers 401 unless the request carries an identity.
pub struct RequireAuth<H> {
    inner: H,
}

/// Wrap `handler` so it only runs for authenticated requests.
pub fn require_auth<H: Handler>(handler: H) -> RequireAuth<H> {
    RequireAuth { inner: handler }
}

impl<H: Handler> Handler for RequireAuth<H> {
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        if ctx.identity.is_none() {
            return reject(StatusCode::UNAUTHORIZED, AUTHENTICATION_REQUIRED);
        }
        self.inner.call(ctx)
    }
}

/// Set of roles allowed through a [`RequireRole`] gate.
#[derive(Debug, Clone)]
pub struct RoleGate {
    roles: Arc<[String]>,
}

/// Build a role gate; wrap handlers with [`RoleGate::wrap`].
///
/// ```ignore
/// router.get("/staff/me", require_role(["admin", "staff"]).wrap(staff_me))?;
/// ```
pub fn require_role<I, S>(roles: I) -> RoleGate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RoleGate {
        roles: roles.into_iter().map(Into::into).collect(),
    }
}

impl RoleGate {
    pub fn wrap<H: Handler>(&self, handler: H) -> RequireRole<H> {
        RequireRole {
            gate: self.clone(),
            inner: handler,
        }
    }

    pub fn allows(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Handler that answers 401 without an identity and 403 for roles outside the gate.
pub struct RequireRole<H> {
    gate: RoleGate,
    inner: H,
}

impl<H: Handler> Handler for RequireRole<H> {
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        let Some(identity) = &ctx.identity else {
            return reject(StatusCode::UNAUTHORIZED, AUTHENTICATION_REQUIRED);
        };
        if !self.gate.allows(&identity.role) {
            return reject(StatusCode::FORBIDDEN, INSUFFICIENT_PERMISSIONS);
        }
        self.inner.call(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_request_url;
    use crate::routing::HandlerError;
    use crate::security::Identity;
    use axum::http::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ctx_as(role: Option<&str>) -> RequestContext {
        let url = parse_request_url("/staff/me").unwrap();
        RequestContext::new(Method::GET, url, "cid".into()).with_identity(role.map(|role| Identity {
            id: 1,
            email: "someone@park.example".into(),
            role: role.into(),
            employee_id: None,
        }))
    }

    fn counting_handler(calls: Arc<AtomicUsize>) -> impl Handler {
        move |_ctx: RequestContext| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(Reply::created(json!({ "ticket": 42 })))
            }
        }
    }

    #[tokio::test]
    async fn test_require_role_without_identity() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = require_role(["admin"]).wrap(counting_handler(calls.clone()));

        let reply = gated.call(ctx_as(None)).await.unwrap();
        assert_eq!(reply, Reply::error(StatusCode::UNAUTHORIZED, "Authentication required."));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_require_role_wrong_role() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = require_role(["admin"]).wrap(counting_handler(calls.clone()));

        let reply = gated.call(ctx_as(Some("customer"))).await.unwrap();
        assert_eq!(reply, Reply::error(StatusCode::FORBIDDEN, "Insufficient permissions."));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_require_role_allowed_forwards_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = require_role(["admin"]).wrap(counting_handler(calls.clone()));

        let reply = gated.call(ctx_as(Some("admin"))).await.unwrap();
        assert_eq!(reply, Reply::created(json!({ "ticket": 42 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_require_role_many_roles() {
        let gate = require_role(vec!["admin".to_string(), "staff".to_string()]);
        assert!(gate.allows("staff"));
        assert!(!gate.allows("customer"));

        let calls = Arc::new(AtomicUsize::new(0));
        let gated = gate.wrap(counting_handler(calls.clone()));
        assert!(gated.call(ctx_as(Some("staff"))).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_require_auth() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = require_auth(counting_handler(calls.clone()));

        let reply = gated.call(ctx_as(None)).await.unwrap();
        assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let reply = gated.call(ctx_as(Some("customer"))).await.unwrap();
        assert_eq!(reply.status(), StatusCode::CREATED);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wrappers_nest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gated = require_auth(require_role(["admin"]).wrap(counting_handler(calls.clone())));

        let reply = gated.call(ctx_as(Some("staff"))).await.unwrap();
        assert_eq!(reply.status(), StatusCode::FORBIDDEN);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
