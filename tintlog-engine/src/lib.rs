//! # tintlog-engine
//!
//! Log dispatch: level filtering, message resolution, repeat suppression with
//! deferred summaries, rendering and extender hooks.
//!
//! ### Components:
//! - `logger`: the `Logger` handle, its builder and the dispatch core,
//!   fanning each line out to every transport
//! - `throttle`: the repeat-suppression state machine
//! - `schedule`: flush timers on a thread, a tokio runtime or a virtual clock
//! - `extender`: post-emission hooks with failure isolation
//! - `global`: the pre-wired process logger
//!
//! ```no_run
//! use tintlog_engine::{field, start_timer, Logger};
//!
//! let logger = Logger::new();
//! let timer = start_timer(100);
//! logger.info_with("user loaded", [field("id", 42), field("took", timer)]);
//! ```

pub mod error;
pub mod extender;
pub mod global;
pub mod logger;
pub mod macros;
pub mod schedule;
pub mod throttle;

pub use error::ScheduleError;
pub use extender::{Extender, LogEvent};
pub use global::global;
pub use logger::{Logger, LoggerBuilder};
pub use schedule::{FlushScheduler, ManualScheduler, ScheduledFlush, ThreadScheduler, TokioScheduler};
pub use throttle::REPEATED_FIELD;

pub use tintlog_config::{LoggerConfig, RendererKind, ThrottleConfig};
pub use tintlog_core::{
    arg, field, lazy, start_timer, timer_field, Arg, Field, FieldValue, IntoArg, Level,
    LogMessage, Timer,
};
pub use tintlog_format::{Console, ConsoleTransport, Formatter, Transport};
pub use tintlog_telemetry::PipelineMetrics;

pub mod prelude {
    pub use crate::{
        arg, field, lazy, start_timer, Field, Level, LogEvent, Logger, LoggerBuilder, Timer,
    };
}
