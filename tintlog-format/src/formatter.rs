//! Formatter contract.
//!
//! A formatter only decides how a fragment is decorated (escape sequences or
//! CSS) and where non-timer fields go (inline or grouped). The layout of a
//! line is shared: optional timestamp, level tag, name tag, message, timer
//! fields, remaining fields, bare values.
//!
//! The buffer that accumulates a line is owned by one emission, so two
//! threads logging through the same formatter never interleave fragments.

use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Value};
use tintlog_core::{Field, FieldValue, Level, LogRecord, Rgb};

use crate::console::{Console, ConsoleArg};

/// Tags are padded to this many characters, then followed by one space.
pub const MIN_TAG_WIDTH: usize = 5;

/// Color of the ` name=` label in front of a timer value.
pub const TIMER_LABEL_COLOR: Rgb = Rgb(0x33, 0x90, 0xff);

/// Color of the inline JSON object holding plain fields.
pub const INLINE_FIELDS_COLOR: Rgb = Rgb(0x8c, 0x8c, 0x8c);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Normal,
    Bold,
}

impl Weight {
    pub fn as_str(self) -> &'static str {
        match self {
            Weight::Normal => "normal",
            Weight::Bold => "bold",
        }
    }
}

/// Where fields that are not timers end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// One stringified object at the end of the line.
    Inline,
    /// Handed to the console as a separate, expandable batch.
    Grouped,
}

pub trait Formatter: Send + Sync {
    /// Placeholder wrapping styled fragments (`%s` or `%c`).
    fn directive(&self) -> &'static str;

    fn use_colors(&self) -> bool;

    /// Opening decoration for a fragment.
    fn style(&self, color: Option<Rgb>, weight: Option<Weight>) -> String;

    /// Decoration restoring the default style.
    fn reset(&self) -> String;

    fn field_layout(&self) -> FieldLayout;

    /// Whether lines start with `[<ISO-8601 time>] `.
    fn timestamp(&self) -> bool {
        false
    }
}

/// The flushed payload of one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageFormat {
    pub format: String,
    pub args: Vec<ConsoleArg>,
    /// Fields to show under the line (grouped layout only).
    pub fields: Vec<Field>,
    /// Bare values to show under the fields (grouped layout only).
    pub values: Vec<FieldValue>,
    pub has_message: bool,
}

impl dyn Formatter + '_ {
    /// A fresh, empty buffer. `now_ms` is the instant timers are measured
    /// against.
    pub fn buffer(&self, now_ms: u64) -> MessageBuffer<'_> {
        MessageBuffer {
            formatter: self,
            now_ms,
            payload: MessageFormat::default(),
        }
    }

    /// Renders a record into a payload without writing it.
    pub fn format(&self, record: &LogRecord) -> MessageFormat {
        self.fill(record).finish()
    }

    /// Renders a record and writes it to `console`.
    pub fn render(&self, record: &LogRecord, console: &dyn Console) {
        self.fill(record).write(record.level, console);
    }

    fn fill(&self, record: &LogRecord) -> MessageBuffer<'_> {
        let mut buffer = self.buffer(record.timestamp_ms);
        if self.timestamp() {
            buffer.timestamp(record.timestamp_ms);
        }
        buffer.tag(record.level.name(), record.level.color());
        if let Some(name) = &record.name {
            buffer.tag(name.as_str(), name.color());
        }
        buffer.message(&record.message);
        buffer.push_fields(&record.fields);
        buffer.push_values(&record.values);
        buffer
    }
}

/// Accumulates one line. Every `write` leaves the buffer empty.
pub struct MessageBuffer<'f> {
    formatter: &'f dyn Formatter,
    now_ms: u64,
    payload: MessageFormat,
}

impl<'f> MessageBuffer<'f> {
    pub fn timestamp(&mut self, at_ms: u64) {
        let iso = i64::try_from(at_ms)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default();
        self.payload.format.push_str("[%s] ");
        self.payload.args.push(ConsoleArg::Text(iso));
    }

    /// Appends a label padded to `MIN_TAG_WIDTH`, plus a separating space.
    pub fn tag(&mut self, name: &str, color: Rgb) {
        let width = name.chars().count();
        let mut spaced = String::with_capacity(name.len() + MIN_TAG_WIDTH + 1);
        spaced.push_str(name);
        spaced.extend(std::iter::repeat(' ').take(MIN_TAG_WIDTH.saturating_sub(width)));
        spaced.push(' ');
        self.push(spaced, Some(color), None);
    }

    /// Appends a fragment, decorated only when colors are on and there is
    /// something to decorate with.
    pub fn push(&mut self, text: impl Into<String>, color: Option<Rgb>, weight: Option<Weight>) {
        let text = text.into();
        let formatter = self.formatter;
        if formatter.use_colors() && (color.is_some() || weight.is_some()) {
            let directive = formatter.directive();
            self.payload.format.push_str(directive);
            self.payload.format.push_str("%s");
            self.payload.format.push_str(directive);
            self.payload
                .args
                .push(ConsoleArg::Text(formatter.style(color, weight)));
            self.payload.args.push(ConsoleArg::Text(text));
            self.payload.args.push(ConsoleArg::Text(formatter.reset()));
        } else {
            self.payload.format.push_str("%s");
            self.payload.args.push(ConsoleArg::Text(text));
        }
    }

    /// Appends the message text. Empty messages add nothing.
    pub fn message(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.payload.has_message = true;
        self.push(text, None, None);
    }

    /// Timer fields render inline as ` <id>=<elapsed>ms`; the rest follow the
    /// formatter's layout.
    pub fn push_fields(&mut self, fields: &[Field]) {
        let (timers, others): (Vec<&Field>, Vec<&Field>) =
            fields.iter().partition(|field| field.is_timer());

        for field in timers {
            if let Some(timer) = field.value().as_timer() {
                self.push(
                    format!(" {}=", field.identifier()),
                    Some(TIMER_LABEL_COLOR),
                    None,
                );
                self.push(
                    format!("{}ms", timer.elapsed_ms(self.now_ms)),
                    Some(timer.color(self.now_ms)),
                    None,
                );
            }
        }

        if others.is_empty() {
            return;
        }
        match self.formatter.field_layout() {
            FieldLayout::Inline => {
                let object: Map<String, Value> = others
                    .iter()
                    .map(|field| {
                        (
                            field.identifier().to_string(),
                            field.value().to_display_json(),
                        )
                    })
                    .collect();
                self.push(" ", None, None);
                self.push(
                    Value::Object(object).to_string(),
                    Some(INLINE_FIELDS_COLOR),
                    None,
                );
            }
            FieldLayout::Grouped => {
                self.payload
                    .fields
                    .extend(others.into_iter().cloned());
            }
        }
    }

    /// Bare values go after the fields: one space-separated fragment each
    /// when inline, raw group items when grouped.
    pub fn push_values(&mut self, values: &[FieldValue]) {
        match self.formatter.field_layout() {
            FieldLayout::Inline => {
                for value in values {
                    self.push(" ", None, None);
                    self.push(
                        ConsoleArg::Value(value.to_display_json()).to_string(),
                        None,
                        None,
                    );
                }
            }
            FieldLayout::Grouped => self.payload.values.extend(values.iter().cloned()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload == MessageFormat::default()
    }

    /// Takes the accumulated payload, leaving the buffer empty.
    pub fn take(&mut self) -> MessageFormat {
        std::mem::take(&mut self.payload)
    }

    pub fn finish(mut self) -> MessageFormat {
        self.take()
    }

    /// Hands the payload to the console. The buffer is emptied before the
    /// console sees anything, so a misbehaving console cannot leave stale
    /// fragments behind.
    pub fn write(&mut self, level: Level, console: &dyn Console) {
        let payload = self.take();
        console.write(level, &payload);
    }
}
