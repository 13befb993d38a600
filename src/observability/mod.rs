//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and store produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
