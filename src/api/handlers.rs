use axum::http::StatusCode;
use serde::Serialize;
use serde_json::json;

use crate::http::{Reply, RequestContext};
use crate::routing::HandlerResult;
use crate::security::access_control::AUTHENTICATION_REQUIRED;

#[derive(Serialize)]
pub struct SystemStatus {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile<'a> {
    pub employee_id: Option<i64>,
    pub role: &'a str,
}

pub async fn get_health(_ctx: RequestContext) -> HandlerResult {
    Ok(Reply::serialize(
        StatusCode::OK,
        &SystemStatus {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )?)
}

pub async fn get_me(ctx: RequestContext) -> HandlerResult {
    match &ctx.identity {
        Some(identity) => Ok(Reply::serialize(StatusCode::OK, identity)?),
        None => Ok(Reply::error(StatusCode::UNAUTHORIZED, AUTHENTICATION_REQUIRED)),
    }
}

pub async fn get_staff_me(ctx: RequestContext) -> HandlerResult {
    match &ctx.identity {
        Some(identity) => Ok(Reply::serialize(
            StatusCode::OK,
            &StaffProfile {
                employee_id: identity.employee_id,
                role: &identity.role,
            },
        )?),
        None => Ok(Reply::error(StatusCode::UNAUTHORIZED, AUTHENTICATION_REQUIRED)),
    }
}

/// Echo the decoded label, query and parsed body back to the caller.
pub async fn post_echo(ctx: RequestContext) -> HandlerResult {
    Ok(Reply::ok(json!({
        "label": ctx.param("label"),
        "query": ctx.query,
        "body": ctx.body.as_json().cloned().or_else(|| ctx.body.as_text().map(|t| t.into())),
    })))
}
