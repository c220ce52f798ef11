//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! wallet, binder, store client, view controller
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (call counters, latency histograms, phase transitions)
//!
//! Consumers:
//!     → stderr via the fmt layer
//!     → Prometheus scrape endpoint when enabled
//! ```

pub mod logging;
pub mod metrics;
