//! ANSI terminal formatter. Lines start with a timestamp and end with the
//! non-timer fields as one JSON object.

use std::io::IsTerminal;

use tintlog_core::Rgb;

use crate::formatter::{FieldLayout, Formatter, Weight};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy)]
pub struct TerminalFormatter {
    colors: bool,
}

impl TerminalFormatter {
    /// Colors follow whether stdout is attached to a terminal.
    pub fn new() -> Self {
        Self::with_colors(std::io::stdout().is_terminal())
    }

    pub fn with_colors(colors: bool) -> Self {
        Self { colors }
    }
}

impl Default for TerminalFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for TerminalFormatter {
    fn directive(&self) -> &'static str {
        "%s"
    }

    fn use_colors(&self) -> bool {
        self.colors
    }

    fn style(&self, color: Option<Rgb>, weight: Option<Weight>) -> String {
        let mut sequence = String::new();
        if weight == Some(Weight::Bold) {
            sequence.push_str(BOLD);
        }
        if let Some(Rgb(r, g, b)) = color {
            sequence.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b));
        }
        sequence
    }

    fn reset(&self) -> String {
        RESET.to_string()
    }

    fn field_layout(&self) -> FieldLayout {
        FieldLayout::Inline
    }

    fn timestamp(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::expand_format;
    use crate::memory::MemoryConsole;
    use tintlog_core::{field, Level, LogRecord, LoggerName, Timer};

    fn record(fields: Vec<tintlog_core::Field>) -> LogRecord {
        LogRecord {
            level: Level::Info,
            name: None,
            message: "hello".to_string(),
            fields,
            values: vec![],
            timestamp_ms: 1_000,
        }
    }

    #[test]
    fn plain_line_has_timestamp_tag_and_inline_fields() {
        let formatter: &dyn Formatter = &TerminalFormatter::with_colors(false);
        let console = MemoryConsole::new();
        formatter.render(&record(vec![field("a", 1), field("b", "x")]), &console);
        assert_eq!(
            console.lines(),
            ["[1970-01-01T00:00:01.000Z] info  hello {\"a\":1,\"b\":\"x\"}"]
        );
    }

    #[test]
    fn named_line_puts_name_after_level() {
        let formatter: &dyn Formatter = &TerminalFormatter::with_colors(false);
        let mut record = record(vec![]);
        record.name = Some(LoggerName::new("db"));
        let payload = formatter.format(&record);
        assert_eq!(
            expand_format(&payload.format, &payload.args),
            "[1970-01-01T00:00:01.000Z] info  db    hello"
        );
    }

    #[test]
    fn timers_come_before_the_json_object() {
        let formatter: &dyn Formatter = &TerminalFormatter::with_colors(false);
        let payload = formatter.format(&record(vec![
            field("user", "ann"),
            field("took", Timer::started_at(100, 900)),
        ]));
        assert_eq!(
            expand_format(&payload.format, &payload.args),
            "[1970-01-01T00:00:01.000Z] info  hello took=100ms {\"user\":\"ann\"}"
        );
        assert!(payload.fields.is_empty());
    }

    #[test]
    fn colored_tags_use_truecolor_escapes() {
        let formatter = TerminalFormatter::with_colors(true);
        assert_eq!(
            formatter.style(Some(Rgb(0x66, 0xcc, 0xff)), Some(Weight::Bold)),
            "\x1b[1m\x1b[38;2;102;204;255m"
        );

        let dyn_formatter: &dyn Formatter = &formatter;
        let payload = dyn_formatter.format(&record(vec![]));
        assert!(payload.format.starts_with("[%s] %s%s%s"));
        assert!(payload
            .args
            .iter()
            .any(|arg| arg.to_string() == "\x1b[38;2;102;204;255m"));
    }
}
