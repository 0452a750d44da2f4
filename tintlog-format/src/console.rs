//! Console-style output sink.
//!
//! A sink receives printf-like payloads (`%s`, `%d`, `%o` consume an argument
//! as text, `%c` consumes a style argument) the way a browser console does.
//! Terminal sinks drop the style arguments.

use std::fmt;

use serde_json::Value;
use tintlog_core::Level;

use crate::formatter::MessageFormat;

/// Style of the identifier in a grouped field line.
pub const FIELD_STYLE: &str = "color: #3794ff; font-weight: bold";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleMethod {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl ConsoleMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleMethod::Trace => "trace",
            ConsoleMethod::Debug => "debug",
            ConsoleMethod::Info => "info",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
        }
    }
}

impl From<Level> for ConsoleMethod {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => ConsoleMethod::Trace,
            Level::Debug => ConsoleMethod::Debug,
            Level::Info => ConsoleMethod::Info,
            Level::Warn => ConsoleMethod::Warn,
            Level::Error => ConsoleMethod::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleArg {
    Text(String),
    Value(Value),
}

impl From<&str> for ConsoleArg {
    fn from(text: &str) -> Self {
        ConsoleArg::Text(text.to_string())
    }
}

impl From<String> for ConsoleArg {
    fn from(text: String) -> Self {
        ConsoleArg::Text(text)
    }
}

impl fmt::Display for ConsoleArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleArg::Text(text) | ConsoleArg::Value(Value::String(text)) => f.write_str(text),
            ConsoleArg::Value(value) => write!(f, "{}", value),
        }
    }
}

pub trait Console: Send + Sync {
    fn log(&self, method: ConsoleMethod, format: &str, args: &[ConsoleArg]);

    /// Writes one flushed payload, which may take several calls when the
    /// fields are grouped.
    ///
    /// Consoles shared between threads override this to hold one lock for
    /// the whole payload, so a group never takes lines from another event.
    fn write(&self, level: Level, payload: &MessageFormat) {
        write_message(self, level, payload);
    }

    fn supports_groups(&self) -> bool {
        false
    }

    fn group_collapsed(&self, format: &str, args: &[ConsoleArg]) {
        let _ = (format, args);
    }

    fn group_end(&self) {}
}

/// Expands a console format string for a text-only destination.
///
/// Arguments left over after the format are appended, space separated.
pub fn expand_format(format: &str, args: &[ConsoleArg]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut args = args.iter();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('s' | 'd' | 'i' | 'f' | 'o' | 'O') => {
                chars.next();
                if let Some(arg) = args.next() {
                    out.push_str(&arg.to_string());
                }
            }
            Some('c') => {
                chars.next();
                let _style = args.next();
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }

    for arg in args {
        out.push(' ');
        out.push_str(&arg.to_string());
    }
    out
}

/// Hands a flushed payload to the console.
///
/// With a message, grouped fields and group support, the fields go one per
/// line inside a collapsed group, followed by the bare values as raw items;
/// otherwise they trail the format arguments.
pub fn write_message<C>(console: &C, level: Level, payload: &MessageFormat)
where
    C: Console + ?Sized,
{
    let method = ConsoleMethod::from(level);
    let grouped = !payload.fields.is_empty() || !payload.values.is_empty();

    if payload.has_message && grouped && console.supports_groups() {
        console.group_collapsed(&payload.format, &payload.args);
        for field in &payload.fields {
            let type_label = field
                .value()
                .type_name()
                .map(|name| format!(" ({})", name))
                .unwrap_or_default();
            console.log(
                method,
                &format!("%c{}%c{}:", field.identifier(), type_label),
                &[
                    ConsoleArg::from(FIELD_STYLE),
                    ConsoleArg::from("color: inherit"),
                    ConsoleArg::Value(field.value().to_display_json()),
                ],
            );
        }
        for value in &payload.values {
            console.log(method, "%o", &[ConsoleArg::Value(value.to_display_json())]);
        }
        console.group_end();
    } else {
        let mut args = payload.args.clone();
        args.extend(
            payload
                .fields
                .iter()
                .map(|field| ConsoleArg::Value(field.to_display_json())),
        );
        args.extend(
            payload
                .values
                .iter()
                .map(|value| ConsoleArg::Value(value.to_display_json())),
        );
        console.log(method, &payload.format, &args);
    }
}
