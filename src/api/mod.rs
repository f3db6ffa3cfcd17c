//! Built-in routes served by the `midway` binary.

pub mod handlers;

use crate::routing::{PatternError, Router};
use crate::security::{require_auth, require_role};
use self::handlers::*;

/// Register every built-in route. Order matters: first match wins.
pub fn register(router: &mut Router) -> Result<(), PatternError> {
    router
        .get("/health", get_health)?
        .get("/me", require_auth(get_me))?
        .get("/staff/me", require_role(["admin", "staff"]).wrap(get_staff_me))?
        .post("/echo/:label", post_echo)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Payload, Reply, RequestContext};
    use crate::routing::Handler;
    use crate::security::Identity;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn router() -> Router {
        let mut router = Router::new();
        register(&mut router).unwrap();
        router
    }

    fn ctx(method: Method, target: &str) -> RequestContext {
        let url = crate::http::parse_request_url(target).unwrap();
        RequestContext::new(method, url, "test".into())
    }

    fn staff() -> Identity {
        Identity {
            id: 9,
            email: "ops@park.example".into(),
            role: "staff".into(),
            employee_id: Some(407),
        }
    }

    #[test]
    fn test_register_order() {
        let router = router();
        let patterns: Vec<_> = router.routes().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["/health", "/me", "/staff/me", "/echo/:label"]);
    }

    #[tokio::test]
    async fn test_health() {
        let found = router().find(&Method::GET, "/health").unwrap();
        let reply = found.handler.call(ctx(Method::GET, "/health")).await.unwrap();
        assert_eq!(
            reply,
            Reply::ok(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
        );
    }

    #[tokio::test]
    async fn test_me_requires_identity() {
        let found = router().find(&Method::GET, "/me").unwrap();
        let reply = found.handler.call(ctx(Method::GET, "/me")).await.unwrap();
        assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);

        let reply = found
            .handler
            .call(ctx(Method::GET, "/me").with_identity(Some(staff())))
            .await
            .unwrap();
        assert_eq!(
            reply,
            Reply::ok(json!({
                "id": 9,
                "email": "ops@park.example",
                "role": "staff",
                "employeeId": 407,
            }))
        );
    }

    #[tokio::test]
    async fn test_staff_me() {
        let found = router().find(&Method::GET, "/staff/me").unwrap();
        let reply = found
            .handler
            .call(ctx(Method::GET, "/staff/me").with_identity(Some(staff())))
            .await
            .unwrap();
        assert_eq!(reply, Reply::ok(json!({ "employeeId": 407, "role": "staff" })));

        let mut guest = staff();
        guest.role = "customer".into();
        let reply = found
            .handler
            .call(ctx(Method::GET, "/staff/me").with_identity(Some(guest)))
            .await
            .unwrap();
        assert_eq!(reply.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_echo() {
        let found = router().find(&Method::POST, "/echo/front%20gate").unwrap();
        let mut request = ctx(Method::POST, "/echo/front%20gate?day=sat");
        request.params = found.params.clone();
        request.body = Payload::Json(json!({ "guests": 4 }));

        let reply = found.handler.call(request).await.unwrap();
        assert_eq!(
            reply,
            Reply::ok(json!({
                "label": "front gate",
                "query": { "day": "sat" },
                "body": { "guests": 4 },
            }))
        );
    }
}
