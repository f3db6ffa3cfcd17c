//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every response:
//!     → cors.rs (Access-Control-* header set)
//!
//! Before routing:
//!     → identity.rs (Authorization header → Identity or none)
//!
//! Per route:
//!     → access_control.rs (require_auth / require_role gates)
//!     → handler
//! ```
//!
//! # Design Decisions
//! - Identity lookup failures degrade to "unauthenticated", never to an error response
//! - Gates reject with a plain reply (401/403), not an error
//! - Fail closed: a gated handler never runs without a matching identity

pub mod access_control;
pub mod cors;
pub mod identity;

pub use access_control::{require_auth, require_role, RequireAuth, RequireRole, RoleGate};
pub use cors::{normalize_origin, CorsPolicy};
pub use identity::{extract_bearer_token, Anonymous, Identity, IdentityError, IdentityResolver, StaticTokens};
