//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher produces, per request:
//!     → logging.rs (one access line keyed by correlation ID, plus warnings/errors)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, text or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Correlation ID stays server-side; it is logged, never returned
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
