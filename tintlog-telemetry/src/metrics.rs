//! ## tintlog-telemetry::metrics
//! **Prometheus counters for the dispatch pipeline**

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

use crate::error::TelemetryError;

/// Counters shared by a logger and all of its named children.
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub registry: Registry,
    /// Lines handed to the formatter, summaries included.
    pub emitted: IntCounter,
    /// Calls swallowed by repeat detection.
    pub suppressed: IntCounter,
    /// Repeat summaries flushed.
    pub summaries: IntCounter,
    pub extender_failures: IntCounter,
    /// Calls that skipped repeat detection because a field could not be
    /// serialized.
    pub serialization_fallbacks: IntCounter,
    /// Suppressed calls covered by each summary.
    pub suppressed_per_summary: Histogram,
}

impl PipelineMetrics {
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let emitted = IntCounter::new("tintlog_emitted_total", "Log lines emitted")?;
        let suppressed = IntCounter::new(
            "tintlog_suppressed_total",
            "Log calls suppressed as repeats",
        )?;
        let summaries = IntCounter::new(
            "tintlog_summaries_total",
            "Repeat summaries flushed",
        )?;
        let extender_failures = IntCounter::new(
            "tintlog_extender_failures_total",
            "Extender calls that failed or panicked",
        )?;
        let serialization_fallbacks = IntCounter::new(
            "tintlog_serialization_fallbacks_total",
            "Log calls that bypassed repeat detection",
        )?;
        let suppressed_per_summary = Histogram::with_opts(
            HistogramOpts::new(
                "tintlog_suppressed_per_summary",
                "Suppressed calls covered by one summary",
            )
            .buckets(vec![1.0, 5.0, 25.0, 100.0, 1_000.0]),
        )?;

        registry.register(Box::new(emitted.clone()))?;
        registry.register(Box::new(suppressed.clone()))?;
        registry.register(Box::new(summaries.clone()))?;
        registry.register(Box::new(extender_failures.clone()))?;
        registry.register(Box::new(serialization_fallbacks.clone()))?;
        registry.register(Box::new(suppressed_per_summary.clone()))?;

        Ok(Self {
            registry,
            emitted,
            suppressed,
            summaries,
            extender_failures,
            serialization_fallbacks,
            suppressed_per_summary,
        })
    }

    pub fn record_summary(&self, suppressed: u64) {
        self.summaries.inc();
        self.suppressed_per_summary.observe(suppressed as f64);
    }

    /// Text exposition format of every registered metric.
    pub fn gather(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
