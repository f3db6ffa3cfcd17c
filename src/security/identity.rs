//! Caller identity resolution.
//!
//! The token format and its verification belong to an external auth
//! service; this module only defines the boundary the dispatcher calls
//! through, plus two resolvers: one that never authenticates and one backed
//! by a static token table from configuration.

use futures_util::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::AuthConfig;

/// The resolved caller attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub employee_id: Option<i64>,
}

/// Identity lookup failure. Logged, never shown to the client.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("bearer token not recognised")]
    UnknownToken,
}

/// Resolves an `Authorization` header value to an identity.
pub trait IdentityResolver: Send + Sync + 'static {
    fn resolve<'a>(
        &'a self,
        authorization: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Identity>, IdentityError>>;
}

/// Extract the token from a `Bearer <token>` header value.
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    authorization
        .strip_prefix("Bearer ")
        .or_else(|| authorization.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolver that treats every request as unauthenticated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityResolver for Anonymous {
    fn resolve<'a>(
        &'a self,
        _authorization: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Identity>, IdentityError>> {
        Box::pin(future::ready(Ok(None)))
    }
}

/// Opaque bearer tokens mapped to fixed identities.
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: HashMap<String, Identity>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let mut table = Self::new();
        for entry in &config.tokens {
            table.insert(
                entry.token.clone(),
                Identity {
                    id: entry.id,
                    email: entry.email.clone(),
                    role: entry.role.clone(),
                    employee_id: entry.employee_id,
                },
            );
        }
        table
    }

    pub fn insert(&mut self, token: impl Into<String>, identity: Identity) {
        self.tokens.insert(token.into(), identity);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn lookup(&self, authorization: Option<&str>) -> Result<Option<Identity>, IdentityError> {
        let Some(token) = authorization.and_then(extract_bearer_token) else {
            return Ok(None);
        };
        self.tokens
            .get(token)
            .cloned()
            .map(Some)
            .ok_or(IdentityError::UnknownToken)
    }
}

impl IdentityResolver for StaticTokens {
    fn resolve<'a>(
        &'a self,
        authorization: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Option<Identity>, IdentityError>> {
        Box::pin(future::ready(self.lookup(authorization)))
    }
}
