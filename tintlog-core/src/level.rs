//! Numeric log level. A higher number is higher severity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// Exact, case-sensitive match on the lowercase level names.
    ///
    /// Used for the `LOG_LEVEL` override, where anything unrecognized must be
    /// ignored rather than rejected.
    pub fn from_env_name(name: &str) -> Option<Level> {
        match name {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Tag color of the level label.
    pub fn color(self) -> Rgb {
        match self {
            Level::Trace => Rgb(0x9e, 0x9e, 0x9e),
            Level::Debug => Rgb(0xff, 0xb8, 0xda),
            Level::Info => Rgb(0x66, 0xcc, 0xff),
            Level::Warn => Rgb(0xff, 0xae, 0x00),
            Level::Error => Rgb(0xff, 0x00, 0x00),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_env_name(s).ok_or_else(|| CoreError::UnknownLevel(s.to_string()))
    }
}
