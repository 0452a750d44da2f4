//! Messages as handed to a logger, and records as handed to a formatter.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

use crate::arg::Args;
use crate::color::{name_color, Rgb};
use crate::error::CoreError;
use crate::field::{Field, FieldValue};
use crate::level::Level;

/// What a lazy message callback produces: the text plus optional fields.
pub type LazyOutput = (String, Vec<Option<Field>>);

/// A literal message, or a callback deferring expensive work until the call
/// is known to survive level filtering.
pub enum LogMessage<'a> {
    Text(Cow<'a, str>),
    Lazy {
        callsite: &'static Location<'static>,
        resolve: Box<dyn FnOnce() -> LazyOutput + 'a>,
    },
}

/// Wraps a callback into a lazy message.
///
/// Two lazy messages compare equal for throttling when they were created at
/// the same source location, without the callbacks ever running.
#[track_caller]
pub fn lazy<'a, F>(resolve: F) -> LogMessage<'a>
where
    F: FnOnce() -> LazyOutput + 'a,
{
    LogMessage::Lazy {
        callsite: Location::caller(),
        resolve: Box::new(resolve),
    }
}

impl<'a> LogMessage<'a> {
    pub fn is_lazy(&self) -> bool {
        matches!(self, LogMessage::Lazy { .. })
    }

    /// Comparable serialized form of the call, used for repeat detection.
    ///
    /// Fails when any argument holds a value that cannot be serialized.
    pub fn throttle_key(&self, args: &Args) -> Result<String, CoreError> {
        args.check_serializable()?;
        let key = match self {
            LogMessage::Text(text) => {
                serde_json::to_string(&("text", text.as_ref(), &args.fields, &args.values))?
            }
            LogMessage::Lazy { callsite, .. } => serde_json::to_string(&(
                "lazy",
                callsite.to_string(),
                &args.fields,
                &args.values,
            ))?,
        };
        Ok(key)
    }

    /// Runs a lazy callback (exactly once) and merges its fields ahead of the
    /// explicit call fields. `None` entries are dropped.
    pub fn resolve(self, args: Args) -> ResolvedMessage {
        let Args { fields, values } = args;
        match self {
            LogMessage::Text(text) => ResolvedMessage {
                text: text.into_owned(),
                fields,
                values,
            },
            LogMessage::Lazy { resolve, .. } => {
                let (text, produced) = resolve();
                ResolvedMessage {
                    text,
                    fields: produced.into_iter().flatten().chain(fields).collect(),
                    values,
                }
            }
        }
    }
}

impl fmt::Debug for LogMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMessage::Text(text) => f.debug_tuple("Text").field(text).finish(),
            LogMessage::Lazy { callsite, .. } => f
                .debug_struct("Lazy")
                .field("callsite", &callsite.to_string())
                .finish_non_exhaustive(),
        }
    }
}

impl<'a> From<&'a str> for LogMessage<'a> {
    fn from(text: &'a str) -> Self {
        LogMessage::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for LogMessage<'a> {
    fn from(text: &'a String) -> Self {
        LogMessage::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for LogMessage<'_> {
    fn from(text: String) -> Self {
        LogMessage::Text(Cow::Owned(text))
    }
}

/// A message whose text and arguments are final. Default arguments are not
/// included yet; the owning logger appends them at emission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMessage {
    pub text: String,
    pub fields: Vec<Field>,
    /// Bare values, in call order.
    pub values: Vec<FieldValue>,
}

impl ResolvedMessage {
    pub fn new(text: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            text: text.into(),
            fields,
            values: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }
}

/// A logger's name together with its tag color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerName {
    name: String,
    color: Rgb,
}

impl LoggerName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let color = name_color(&name);
        Self { name, color }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// Everything a formatter needs to render one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub name: Option<LoggerName>,
    pub message: String,
    pub fields: Vec<Field>,
    /// Bare values, rendered after the fields.
    pub values: Vec<FieldValue>,
    pub timestamp_ms: u64,
}
