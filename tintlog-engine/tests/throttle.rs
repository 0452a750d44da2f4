//! End-to-end repeat suppression through a real formatter and console, on a
//! virtual clock.

use std::sync::Arc;

use parking_lot::Mutex;
use tintlog_engine::{
    field, lazy, Level, LogEvent, Logger, LoggerConfig, ManualScheduler, PipelineMetrics,
    ThrottleConfig, REPEATED_FIELD,
};
use tintlog_core::{Timer, VirtualClock};
use tintlog_format::{BrowserFormatter, EntryKind, MemoryConsole, TerminalFormatter};

struct Fixture {
    logger: Logger,
    console: Arc<MemoryConsole>,
    scheduler: ManualScheduler,
    metrics: Arc<PipelineMetrics>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_throttle(ThrottleConfig::default())
    }

    fn with_throttle(throttle: ThrottleConfig) -> Self {
        let clock = VirtualClock::new(1_700_000_000_000);
        let scheduler = ManualScheduler::new(clock.clone());
        let console = Arc::new(MemoryConsole::new());
        let metrics = Arc::new(PipelineMetrics::new().unwrap());
        let logger = Logger::builder()
            .config(LoggerConfig::default())
            .throttle(throttle)
            .formatter(Arc::new(TerminalFormatter::with_colors(false)))
            .console(console.clone())
            .clock(Arc::new(clock))
            .scheduler(Arc::new(scheduler.clone()))
            .metrics(metrics.clone())
            .build();
        Self {
            logger,
            console,
            scheduler,
            metrics,
        }
    }

    fn lines(&self) -> Vec<String> {
        self.console
            .lines()
            .into_iter()
            .map(|line| line.split_once("] ").map(|(_, rest)| rest.to_string()).unwrap_or(line))
            .collect()
    }
}

#[test]
fn ten_identical_calls_emit_five_then_one_summary() {
    let f = Fixture::new();
    for _ in 0..10 {
        f.logger.info_with("polling", [field("queue", "jobs")]);
        f.scheduler.advance(10);
    }
    assert_eq!(f.lines().len(), 5);

    f.scheduler.advance(1_000);
    let lines = f.lines();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[5],
        "info  polling {\"queue\":\"jobs\",\"repeated\":\"4 times\"}"
    );
    assert_eq!(f.metrics.emitted.get(), 6);
    assert_eq!(f.metrics.suppressed.get(), 5);
}

#[test]
fn a_different_message_flushes_the_streak_first() {
    let f = Fixture::new();
    for _ in 0..6 {
        f.logger.info("A");
    }
    f.logger.info("B");
    assert_eq!(
        f.lines(),
        ["info  A", "info  A", "info  A", "info  A", "info  A", "info  A", "info  B"]
    );
    // Exactly one call was suppressed, so the flushed copy carries no count.
    assert!(!f.lines()[5].contains(REPEATED_FIELD));

    f.scheduler.advance(5_000);
    assert_eq!(f.lines().len(), 7);
}

#[test]
fn silence_longer_than_the_window_restarts_counting() {
    let f = Fixture::new();
    for _ in 0..5 {
        f.logger.warn("disk low");
    }
    f.scheduler.advance(1_500);
    for _ in 0..5 {
        f.logger.warn("disk low");
    }
    assert_eq!(f.lines().len(), 10);
    assert_eq!(f.scheduler.pending(), 0);
}

#[test]
fn different_fields_are_different_messages() {
    let f = Fixture::new();
    for i in 0..20 {
        f.logger.info_with("job done", [field("id", i)]);
    }
    assert_eq!(f.lines().len(), 20);
    assert_eq!(f.metrics.suppressed.get(), 0);
}

#[test]
fn unserializable_fields_fail_open() {
    let f = Fixture::new();
    let mut bad = std::collections::HashMap::new();
    bad.insert((1, 2), "x");
    for _ in 0..10 {
        f.logger.info_with("cyclic", [field("graph", bad.clone())]);
    }
    assert_eq!(f.lines().len(), 10);
    assert_eq!(f.metrics.serialization_fallbacks.get(), 10);
}

#[test]
fn custom_threshold_and_window() {
    let f = Fixture::with_throttle(ThrottleConfig {
        window_ms: 100,
        min_threshold: 2,
    });
    for _ in 0..5 {
        f.logger.error("boom");
    }
    assert_eq!(f.lines().len(), 2);
    f.scheduler.advance(100);
    assert_eq!(
        f.lines().last().map(String::as_str),
        Some("error boom {\"repeated\":\"2 times\"}")
    );
}

#[test]
fn summaries_reach_extenders() {
    let f = Fixture::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    f.logger.extend(move |event: &LogEvent<'_>| {
        let repeated = event
            .field(REPEATED_FIELD)
            .map(|f| f.value().to_display_json().to_string());
        sink.lock().push((event.summary, event.level, repeated));
        Ok(())
    });

    for _ in 0..7 {
        f.logger.warn("retrying");
    }
    f.scheduler.advance(1_000);

    let seen = seen.lock();
    assert_eq!(seen.len(), 6);
    assert!(seen[..5].iter().all(|(summary, _, _)| !summary));
    assert_eq!(
        seen[5],
        (true, Level::Warn, Some("\"1 times\"".to_string()))
    );
}

#[test]
fn lazy_messages_throttle_by_callsite_and_resolve_once() {
    let f = Fixture::new();
    let calls = std::cell::Cell::new(0);
    for i in 0..9 {
        f.logger.info(lazy(|| {
            calls.set(calls.get() + 1);
            (format!("expensive #{i}"), vec![Some(field("i", i)), None])
        }));
    }
    assert_eq!(calls.get(), 5);
    f.scheduler.advance(1_000);
    let lines = f.lines();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[5], "info  expensive #4 {\"i\":4,\"repeated\":\"3 times\"}");
    assert_eq!(calls.get(), 5);
}

#[test]
fn named_timer_fields_render_inline() {
    let f = Fixture::new();
    let db = f.logger.named("db", [field("pool", 1)]);
    let started = Timer::started_at(100, 1_700_000_000_000);
    f.scheduler.advance(50);
    db.info_with("query", [field("took", started)]);
    assert_eq!(f.lines(), ["info  db    query took=50ms {\"pool\":1}"]);
}

#[test]
fn browser_rendering_groups_fields() {
    let f = Fixture::new();
    f.logger.set_formatter(Arc::new(BrowserFormatter::new()));
    f.logger.info_with("user", [field("id", 7)]);
    let kinds: Vec<EntryKind> = f.console.entries().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [EntryKind::GroupStart, EntryKind::Log, EntryKind::GroupEnd]
    );
}
