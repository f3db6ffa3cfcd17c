//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     (method, "/rides/:id", handler)
//!     → matcher.rs (compile template to anchored regex + param names)
//!     → router.rs (append to ordered table)
//!     → Freeze as immutable Router (Arc-shared)
//!
//! Incoming Request (method, path):
//!     → router.rs (scan in registration order)
//!     → matcher.rs (regex captures)
//!     → Return: RouteMatch { handler, decoded params } or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Malformed templates fail registration, never a request
//! - First match wins (ordered by registration)

pub mod handler;
pub mod matcher;
pub mod router;

pub use handler::{Handler, HandlerError, HandlerResult};
pub use matcher::{PathMatcher, PatternError};
pub use router::{Route, RouteMatch, Router};
