//! Process console. Debug and info lines go to stdout; trace, warn and error
//! lines go to stderr.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tintlog_core::Level;

use crate::console::{expand_format, write_message, Console, ConsoleArg, ConsoleMethod};
use crate::formatter::MessageFormat;

const INDENT: &str = "  ";

#[derive(Debug, Default)]
pub struct StdConsole {
    depth: AtomicUsize,
    /// Held for the whole of one `write`, so group indentation belongs to
    /// one event at a time.
    emission: Mutex<()>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_stderr(method: ConsoleMethod) -> bool {
        matches!(
            method,
            ConsoleMethod::Trace | ConsoleMethod::Warn | ConsoleMethod::Error
        )
    }

    fn indented(&self, line: &str) -> String {
        let depth = self.depth.load(Ordering::Acquire);
        let mut out = INDENT.repeat(depth);
        out.push_str(line);
        out
    }

    fn write_line(stderr: bool, line: &str) {
        // A closed pipe must not take the application down with it.
        let _ = if stderr {
            writeln!(io::stderr().lock(), "{}", line)
        } else {
            writeln!(io::stdout().lock(), "{}", line)
        };
    }
}

impl Console for StdConsole {
    fn log(&self, method: ConsoleMethod, format: &str, args: &[ConsoleArg]) {
        let line = self.indented(&expand_format(format, args));
        Self::write_line(Self::to_stderr(method), &line);
    }

    fn write(&self, level: Level, payload: &MessageFormat) {
        let _emission = self.emission.lock();
        write_message(self, level, payload);
    }

    fn supports_groups(&self) -> bool {
        true
    }

    fn group_collapsed(&self, format: &str, args: &[ConsoleArg]) {
        let line = self.indented(&expand_format(format, args));
        Self::write_line(false, &line);
        self.depth.fetch_add(1, Ordering::AcqRel);
    }

    fn group_end(&self) {
        let _ = self
            .depth
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |depth| {
                Some(depth.saturating_sub(1))
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_method() {
        assert!(StdConsole::to_stderr(ConsoleMethod::Error));
        assert!(StdConsole::to_stderr(ConsoleMethod::Warn));
        assert!(!StdConsole::to_stderr(ConsoleMethod::Info));
        assert!(!StdConsole::to_stderr(ConsoleMethod::Debug));
    }

    #[test]
    fn groups_indent_and_never_underflow() {
        let console = StdConsole::new();
        console.group_collapsed("%s", &["head".into()]);
        assert_eq!(console.indented("x"), "  x");
        console.group_end();
        console.group_end();
        assert_eq!(console.indented("x"), "x");
    }
}
