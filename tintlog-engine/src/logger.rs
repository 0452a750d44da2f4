//! The dispatch core.
//!
//! A `Logger` is a cheap handle; clones share everything. Loggers derived
//! with `named` share the pipeline (transports, extenders, clock, scheduler,
//! metrics) but keep their own level, mute flag and throttle state.
//!
//! Nothing user-supplied runs while the throttle state is locked: lazy
//! callbacks, formatting, console writes and extenders all happen after the
//! decision is taken, so an extender may log through the same logger.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tintlog_config::{LoggerConfig, ThrottleConfig};
use tintlog_core::{
    Args, Clock, IntoArg, Level, LogMessage, LogRecord, LoggerName, ResolvedMessage, SystemClock,
};
use tintlog_format::{formatter_for, Console, ConsoleTransport, Formatter, StdConsole, Transport};
use tintlog_telemetry::{Diagnostics, PipelineMetrics};

use crate::extender::{run_extenders, Extender, LogEvent};
use crate::schedule::{FlushScheduler, ThreadScheduler};
use crate::throttle::{Decision, Summary, ThrottleState};

/// Collaborators shared by a logger and everything `named` from it.
struct Pipeline {
    transports: RwLock<Vec<Arc<dyn Transport>>>,
    extenders: RwLock<Vec<Extender>>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn FlushScheduler>,
    metrics: Option<Arc<PipelineMetrics>>,
}

struct LoggerCore {
    pipeline: Arc<Pipeline>,
    name: Option<LoggerName>,
    defaults: Args,
    level: AtomicU8,
    muted: AtomicBool,
    throttle: ThrottleConfig,
    state: Mutex<ThrottleState>,
}

#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
}

impl Logger {
    /// A logger configured from the environment (`LOG_LEVEL`), rendering for
    /// the detected environment to the process console.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.core.name.as_ref().map(LoggerName::as_str)
    }

    pub fn level(&self) -> Level {
        level_from_u8(self.core.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.core.level.store(level as u8, Ordering::Relaxed);
    }

    /// Silences this logger for good. Loggers already derived from it are
    /// unaffected; loggers derived later start muted.
    pub fn mute(&self) {
        self.core.muted.store(true, Ordering::Relaxed);
    }

    pub fn is_muted(&self) -> bool {
        self.core.muted.load(Ordering::Relaxed)
    }

    /// Whether a call at `level` would get past filtering.
    pub fn enabled(&self, level: Level) -> bool {
        !self.is_muted() && level >= self.level()
    }

    pub fn throttle_config(&self) -> &ThrottleConfig {
        &self.core.throttle
    }

    pub fn metrics(&self) -> Option<&PipelineMetrics> {
        self.core.pipeline.metrics.as_deref()
    }

    /// Swaps the renderer of every transport that has one, for this logger
    /// and every logger sharing its pipeline.
    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        for transport in self.core.pipeline.transports.read().iter() {
            transport.set_formatter(formatter.clone());
        }
    }

    /// Formatter of the first transport that has one.
    pub fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        self.core
            .pipeline
            .transports
            .read()
            .iter()
            .find_map(|transport| transport.formatter())
    }

    /// Adds an output. Every line is written to each transport in the order
    /// they were added; the list is shared with related loggers.
    pub fn add_transport(&self, transport: Arc<dyn Transport>) {
        self.core.pipeline.transports.write().push(transport);
    }

    /// Registers a hook run after every emitted line. The list is shared
    /// with related loggers.
    pub fn extend<F>(&self, extender: F)
    where
        F: Fn(&LogEvent<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.core.pipeline.extenders.write().push(Arc::new(extender));
    }

    /// A sub-logger tagged with `name`. `defaults` (fields or bare values)
    /// are appended to every line it emits; `None` entries are dropped.
    pub fn named<I>(&self, name: impl Into<String>, defaults: I) -> Logger
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        let core = LoggerCore {
            pipeline: self.core.pipeline.clone(),
            name: Some(LoggerName::new(name)),
            defaults: Args::collect(defaults),
            level: AtomicU8::new(self.level() as u8),
            muted: AtomicBool::new(self.is_muted()),
            throttle: self.core.throttle.clone(),
            state: Mutex::new(ThrottleState::new()),
        };
        Logger {
            core: Arc::new(core),
        }
    }

    pub fn trace<'a>(&self, message: impl Into<LogMessage<'a>>) {
        self.log(Level::Trace, message, no_fields())
    }

    pub fn debug<'a>(&self, message: impl Into<LogMessage<'a>>) {
        self.log(Level::Debug, message, no_fields())
    }

    pub fn info<'a>(&self, message: impl Into<LogMessage<'a>>) {
        self.log(Level::Info, message, no_fields())
    }

    pub fn warn<'a>(&self, message: impl Into<LogMessage<'a>>) {
        self.log(Level::Warn, message, no_fields())
    }

    pub fn error<'a>(&self, message: impl Into<LogMessage<'a>>) {
        self.log(Level::Error, message, no_fields())
    }

    pub fn trace_with<'a, I>(&self, message: impl Into<LogMessage<'a>>, fields: I)
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        self.log(Level::Trace, message, fields)
    }

    pub fn debug_with<'a, I>(&self, message: impl Into<LogMessage<'a>>, fields: I)
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        self.log(Level::Debug, message, fields)
    }

    pub fn info_with<'a, I>(&self, message: impl Into<LogMessage<'a>>, fields: I)
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        self.log(Level::Info, message, fields)
    }

    pub fn warn_with<'a, I>(&self, message: impl Into<LogMessage<'a>>, fields: I)
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        self.log(Level::Warn, message, fields)
    }

    pub fn error_with<'a, I>(&self, message: impl Into<LogMessage<'a>>, fields: I)
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        self.log(Level::Error, message, fields)
    }

    /// Logs at `level`. `args` mixes named fields (`field`) and bare values
    /// (`arg`). Filtered calls return before the message or the arguments
    /// are looked at.
    pub fn log<'a, I>(&self, level: Level, message: impl Into<LogMessage<'a>>, args: I)
    where
        I: IntoIterator,
        I::Item: IntoArg,
    {
        if !self.enabled(level) {
            return;
        }
        self.core.handle(level, message.into(), Args::collect(args));
    }

    /// Emits the pending repeat summary now instead of when its timer fires.
    pub fn flush(&self) {
        let summary = self
            .core
            .state
            .lock()
            .flush(self.core.throttle.min_threshold);
        if let Some(summary) = summary {
            self.core.emit_summary(summary);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .field("muted", &self.is_muted())
            .field("throttle", &self.core.throttle)
            .finish_non_exhaustive()
    }
}

impl LoggerCore {
    fn handle(self: &Arc<Self>, level: Level, message: LogMessage<'_>, args: Args) {
        let key = match message.throttle_key(&args) {
            Ok(key) => Some(key),
            Err(err) => {
                Diagnostics::serialization_fallback(&err);
                if let Some(metrics) = &self.pipeline.metrics {
                    metrics.serialization_fallbacks.inc();
                }
                None
            }
        };
        let now_ms = self.pipeline.clock.now_ms();

        let decision = {
            let mut state = self.state.lock();
            if let Some(mut timer) = state.take_timer() {
                timer.cancel();
            }
            let decision = state.observe(key, now_ms, &self.throttle);
            if let Decision::Suppress { generation } = decision {
                self.arm_flush(&mut state, generation);
            }
            decision
        };

        match decision {
            Decision::Suppress { .. } => {
                if let Some(metrics) = &self.pipeline.metrics {
                    metrics.suppressed.inc();
                }
            }
            Decision::Emit { summary, seq } => {
                if let Some(summary) = summary {
                    self.emit_summary(summary);
                }
                let resolved = message.resolve(args);
                self.state
                    .lock()
                    .record_emission(seq, level, resolved.clone());
                self.emit(level, resolved, false);
            }
        }
    }

    fn arm_flush(self: &Arc<Self>, state: &mut ThrottleState, generation: u64) {
        let core = Arc::downgrade(self);
        let task = Box::new(move || {
            if let Some(core) = core.upgrade() {
                core.flush_if_current(generation);
            }
        });
        match self.pipeline.scheduler.schedule(self.throttle.window(), task) {
            Ok(timer) => state.arm(timer),
            // The summary still goes out with the next passing call.
            Err(err) => Diagnostics::schedule_failed(&err),
        }
    }

    fn flush_if_current(&self, generation: u64) {
        let summary = self
            .state
            .lock()
            .flush_if_current(generation, self.throttle.min_threshold);
        if let Some(summary) = summary {
            self.emit_summary(summary);
        }
    }

    fn emit_summary(&self, summary: Summary) {
        if let Some(metrics) = &self.pipeline.metrics {
            metrics.record_summary(u64::from(summary.suppressed));
        }
        self.emit(summary.level, summary.message, true);
    }

    fn emit(&self, level: Level, message: ResolvedMessage, summary: bool) {
        let ResolvedMessage {
            text,
            mut fields,
            mut values,
        } = message;
        fields.extend(self.defaults.fields.iter().cloned());
        values.extend(self.defaults.values.iter().cloned());
        let record = LogRecord {
            level,
            name: self.name.clone(),
            message: text,
            fields,
            values,
            timestamp_ms: self.pipeline.clock.now_ms(),
        };

        let transports = self.pipeline.transports.read().clone();
        for transport in &transports {
            transport.log(&record);
        }
        if let Some(metrics) = &self.pipeline.metrics {
            metrics.emitted.inc();
        }

        let extenders = self.pipeline.extenders.read().clone();
        if !extenders.is_empty() {
            run_extenders(
                &extenders,
                &LogEvent::from_record(&record, summary),
                self.pipeline.metrics.as_deref(),
            );
        }
    }
}

impl Drop for LoggerCore {
    /// A streak still waiting for its timer is flushed rather than lost.
    fn drop(&mut self) {
        let summary = self.state.get_mut().flush(self.throttle.min_threshold);
        if let Some(summary) = summary {
            self.emit_summary(summary);
        }
    }
}

/// Explicit construction of a root logger.
pub struct LoggerBuilder {
    config: LoggerConfig,
    formatter: Option<Arc<dyn Formatter>>,
    console: Option<Arc<dyn Console>>,
    transports: Vec<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
    scheduler: Option<Arc<dyn FlushScheduler>>,
    metrics: Option<Arc<PipelineMetrics>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            config: LoggerConfig::from_env(),
            formatter: None,
            console: None,
            transports: Vec::new(),
            clock: None,
            scheduler: None,
            metrics: None,
        }
    }
}

impl LoggerBuilder {
    /// Replaces the whole configuration, environment overrides included.
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    pub fn throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.config.throttle = throttle;
        self
    }

    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Console of the primary transport.
    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = Some(console);
        self
    }

    /// An output written after the primary console transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transports.push(transport);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn FlushScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn metrics(mut self, metrics: Arc<PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Logger {
        let LoggerBuilder {
            config,
            formatter,
            console,
            transports: extra,
            clock,
            scheduler,
            metrics,
        } = self;

        let formatter =
            formatter.unwrap_or_else(|| formatter_for(config.renderer, config.colors));
        let console = console.unwrap_or_else(|| Arc::new(StdConsole::new()));
        let mut transports: Vec<Arc<dyn Transport>> =
            vec![Arc::new(ConsoleTransport::new(formatter, console))];
        transports.extend(extra);
        let pipeline = Pipeline {
            transports: RwLock::new(transports),
            extenders: RwLock::new(Vec::new()),
            clock: clock.unwrap_or_else(|| Arc::new(SystemClock)),
            scheduler: scheduler.unwrap_or_else(|| Arc::new(ThreadScheduler::new())),
            metrics,
        };
        let core = LoggerCore {
            pipeline: Arc::new(pipeline),
            name: None,
            defaults: Args::new(),
            level: AtomicU8::new(config.level as u8),
            muted: AtomicBool::new(false),
            throttle: config.throttle,
            state: Mutex::new(ThrottleState::new()),
        };
        Logger {
            core: Arc::new(core),
        }
    }
}

fn level_from_u8(raw: u8) -> Level {
    Level::ALL
        .get(usize::from(raw))
        .copied()
        .unwrap_or_default()
}

fn no_fields() -> std::iter::Empty<tintlog_core::Field> {
    std::iter::empty()
}
