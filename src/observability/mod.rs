//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured logs, stdout)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The tracing subscriber is initialized once in `main`
//! - Metric updates are cheap (atomic increments) and safe to call before
//!   the exporter is installed

pub mod metrics;
