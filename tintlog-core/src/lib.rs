//! # tintlog-core
//!
//! Value carriers shared by every tintlog crate.
//!
//! ### Key Submodules:
//! - `level`: the five-level total order and its tag colors
//! - `field`: key/value annotations, including elapsed-time `Timer` values
//! - `arg`: call arguments, fields or bare values
//! - `color`: `Rgb` plus the deterministic name-to-color hash
//! - `message`: literal and lazy messages, resolved messages, render records
//! - `time`: `Clock` abstraction with a system and a virtual implementation
//!
//! Nothing in here performs I/O; formatting lives in `tintlog-format` and the
//! dispatch state machine in `tintlog-engine`.

pub mod arg;
pub mod color;
pub mod error;
pub mod field;
pub mod level;
pub mod message;
pub mod time;

pub mod prelude {
    pub use crate::arg::*;
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::field::*;
    pub use crate::level::*;
    pub use crate::message::*;
    pub use crate::time::*;
}

pub use arg::{arg, Arg, Args, IntoArg};
pub use color::{name_color, Rgb};
pub use error::CoreError;
pub use field::{
    field, start_timer, timer_color, timer_field, Field, FieldValue, IntoFieldValue, Timer,
};
pub use level::Level;
pub use message::{lazy, LazyOutput, LogMessage, LogRecord, LoggerName, ResolvedMessage};
pub use time::{Clock, SystemClock, VirtualClock};
