//! # tintlog-format
//!
//! Turns a `LogRecord` into a console-style payload (`format` string plus
//! arguments plus grouped fields) and hands it to a `Console` sink.
//!
//! ### Components:
//! - `formatter`: the `Formatter` trait and the per-emission `MessageBuffer`
//! - `terminal`: ANSI escape sequences, fields inline as one JSON object
//! - `browser`: CSS directives, fields in a collapsed group
//! - `console`: the sink trait and level-to-method mapping
//! - `std_console` / `memory`: process and in-memory sinks
//! - `transport`: the outputs a logger fans out to

pub mod browser;
pub mod console;
pub mod formatter;
pub mod memory;
pub mod std_console;
pub mod terminal;
pub mod transport;

use std::sync::Arc;

use tintlog_config::RendererKind;

pub use browser::BrowserFormatter;
pub use console::{expand_format, write_message, Console, ConsoleArg, ConsoleMethod};
pub use formatter::{FieldLayout, Formatter, MessageBuffer, MessageFormat, Weight};
pub use memory::{ConsoleEntry, EntryKind, MemoryConsole};
pub use std_console::StdConsole;
pub use terminal::TerminalFormatter;
pub use transport::{ConsoleTransport, Transport};

/// Builds the formatter for a renderer kind. `colors` only affects the
/// terminal variant; `None` follows stdout detection.
pub fn formatter_for(kind: RendererKind, colors: Option<bool>) -> Arc<dyn Formatter> {
    match kind.resolve() {
        RendererKind::Browser => Arc::new(BrowserFormatter::new()),
        _ => match colors {
            Some(enabled) => Arc::new(TerminalFormatter::with_colors(enabled)),
            None => Arc::new(TerminalFormatter::new()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_kind_groups_fields() {
        let formatter = formatter_for(RendererKind::Browser, Some(false));
        assert_eq!(formatter.field_layout(), FieldLayout::Grouped);
        assert!(formatter.use_colors());
    }

    #[test]
    fn terminal_kind_honours_color_override() {
        let formatter = formatter_for(RendererKind::Terminal, Some(false));
        assert_eq!(formatter.field_layout(), FieldLayout::Inline);
        assert!(!formatter.use_colors());
    }
}
