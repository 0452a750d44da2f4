//! Post-emission hooks.
//!
//! Extenders see every line that reached the formatter, repeat summaries
//! included, in registration order. A failing or panicking extender is
//! reported and skipped; its siblings still run and the logging call never
//! notices.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tintlog_core::{Field, FieldValue, Level, LogRecord};
use tintlog_telemetry::{Diagnostics, PipelineMetrics};

/// What an extender receives for one emitted line.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    /// Name of the emitting logger, `None` for the root logger.
    pub section: Option<&'a str>,
    pub level: Level,
    pub message: &'a str,
    /// Fields as rendered, default fields last.
    pub fields: &'a [Field],
    /// Bare values as rendered, default values last.
    pub values: &'a [FieldValue],
    pub timestamp_ms: u64,
    /// Whether this line is a repeat summary.
    pub summary: bool,
}

impl<'a> LogEvent<'a> {
    pub fn from_record(record: &'a LogRecord, summary: bool) -> Self {
        Self {
            section: record.name.as_ref().map(|name| name.as_str()),
            level: record.level,
            message: &record.message,
            fields: &record.fields,
            values: &record.values,
            timestamp_ms: record.timestamp_ms,
            summary,
        }
    }

    pub fn field(&self, identifier: &str) -> Option<&'a Field> {
        self.fields.iter().find(|f| f.identifier() == identifier)
    }
}

pub type Extender = Arc<dyn Fn(&LogEvent<'_>) -> anyhow::Result<()> + Send + Sync>;

/// Runs every extender against `event`, isolating failures.
pub(crate) fn run_extenders(
    extenders: &[Extender],
    event: &LogEvent<'_>,
    metrics: Option<&PipelineMetrics>,
) {
    for (index, extender) in extenders.iter().enumerate() {
        let failure = match panic::catch_unwind(AssertUnwindSafe(|| extender(event))) {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };
        Diagnostics::extender_failed(index, &failure);
        if let Some(metrics) = metrics {
            metrics.extender_failures.inc();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tintlog_core::{field, LoggerName};

    fn record() -> LogRecord {
        LogRecord {
            level: Level::Warn,
            name: Some(LoggerName::new("db")),
            message: "slow query".to_string(),
            fields: vec![field("ms", 812)],
            values: vec![FieldValue::Json(serde_json::json!("slow"))],
            timestamp_ms: 5,
        }
    }

    #[test]
    fn failures_do_not_stop_siblings() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = seen.clone();
        let last = seen.clone();
        let extenders: Vec<Extender> = vec![
            Arc::new(move |event: &LogEvent<'_>| -> anyhow::Result<()> {
                first.lock().push(format!("first:{}", event.message));
                Ok(())
            }),
            Arc::new(|_: &LogEvent<'_>| -> anyhow::Result<()> {
                anyhow::bail!("sink offline")
            }),
            Arc::new(|_: &LogEvent<'_>| -> anyhow::Result<()> { panic!("extender bug") }),
            Arc::new(move |event: &LogEvent<'_>| -> anyhow::Result<()> {
                last.lock().push(format!("last:{}", event.section.unwrap_or("")));
                Ok(())
            }),
        ];
        let metrics = PipelineMetrics::new().unwrap();
        let record = record();

        run_extenders(
            &extenders,
            &LogEvent::from_record(&record, false),
            Some(&metrics),
        );

        assert_eq!(*seen.lock(), ["first:slow query", "last:db"]);
        assert_eq!(metrics.extender_failures.get(), 2);
    }

    #[test]
    fn events_expose_fields_by_name() {
        let record = record();
        let event = LogEvent::from_record(&record, true);
        assert!(event.summary);
        assert_eq!(
            event.field("ms").map(|f| f.value().to_display_json().to_string()),
            Some("812".to_string())
        );
        assert!(event.field("missing").is_none());
        assert_eq!(event.values.len(), 1);
    }

    #[test]
    fn panic_payloads_are_readable() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(owned.as_ref()), "boom");
        let unknown: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(unknown.as_ref()), "unknown panic");
    }
}
