//! # tintlog-telemetry
//!
//! Self-diagnostics for the logging pipeline. tintlog reports its own
//! trouble (failing extenders, unschedulable flushes, unserializable fields)
//! through `tracing`, never through the logger it is diagnosing.
//!
//! ### Components:
//! - `diagnostics`: subscriber setup and the pipeline's diagnostic events
//! - `metrics`: Prometheus counters for emissions, suppressions and failures

pub mod diagnostics;
pub mod error;
pub mod metrics;

pub use diagnostics::Diagnostics;
pub use error::TelemetryError;
pub use metrics::PipelineMetrics;
