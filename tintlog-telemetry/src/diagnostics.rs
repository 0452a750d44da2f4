//! ## tintlog-telemetry::diagnostics
//! **tracing output for the library itself**
//!
//! The filter comes from `TINTLOG_DIAGNOSTICS` and defaults to `warn`, so an
//! application that never looks sees only real problems.

use std::fmt::Display;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::TelemetryError;

/// Environment variable holding the diagnostics filter directive.
pub const DIAGNOSTICS_ENV: &str = "TINTLOG_DIAGNOSTICS";

const DEFAULT_FILTER: &str = "warn";

#[derive(Clone, Copy, Debug)]
pub struct Diagnostics;

impl Diagnostics {
    /// Installs the diagnostics subscriber. Does nothing if the process
    /// already has a global subscriber.
    pub fn init() {
        let _ = Self::try_init();
    }

    pub fn try_init() -> Result<(), TelemetryError> {
        fmt()
            .with_env_filter(Self::filter())
            .with_writer(std::io::stderr)
            .with_thread_names(true)
            .try_init()
            .map_err(|err| TelemetryError::Subscriber(err.to_string()))
    }

    fn filter() -> EnvFilter {
        EnvFilter::try_from_env(DIAGNOSTICS_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }

    /// An extender returned an error or panicked.
    #[inline]
    pub fn extender_failed(index: usize, error: &dyn Display) {
        tracing::warn!(extender = index, error = %error, "Log extender failed");
    }

    /// A flush timer could not be armed; the summary waits for the next call.
    #[inline]
    pub fn schedule_failed(error: &dyn Display) {
        tracing::warn!(error = %error, "Could not schedule repeat summary flush");
    }

    /// A call carried a field that cannot be serialized, so it bypassed
    /// repeat detection.
    #[inline]
    pub fn serialization_fallback(error: &dyn Display) {
        tracing::debug!(error = %error, "Log call is not comparable, throttling skipped");
    }
}
