//! In-memory console, for tests and for embedding tintlog behind another UI.

use parking_lot::Mutex;
use tintlog_core::Level;

use crate::console::{expand_format, write_message, Console, ConsoleArg, ConsoleMethod};
use crate::formatter::MessageFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Log,
    GroupStart,
    GroupEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleEntry {
    pub kind: EntryKind,
    /// `None` for group boundaries, which have no level.
    pub method: Option<ConsoleMethod>,
    pub format: String,
    pub args: Vec<ConsoleArg>,
    /// `format` expanded with `args`, styles dropped.
    pub text: String,
    pub depth: usize,
}

#[derive(Debug)]
pub struct MemoryConsole {
    entries: Mutex<Vec<ConsoleEntry>>,
    /// Held for the whole of one `write`.
    emission: Mutex<()>,
    groups: bool,
}

impl Default for MemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            emission: Mutex::new(()),
            groups: true,
        }
    }

    /// A console without `groupCollapsed`; fields always trail the line.
    pub fn without_groups() -> Self {
        Self {
            groups: false,
            ..Self::new()
        }
    }

    pub fn entries(&self) -> Vec<ConsoleEntry> {
        self.entries.lock().clone()
    }

    /// Expanded text of every log line and group header, in order.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.kind != EntryKind::GroupEnd)
            .map(|entry| entry.text.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn current_depth(entries: &[ConsoleEntry]) -> usize {
        entries.iter().fold(0usize, |depth, entry| match entry.kind {
            EntryKind::GroupStart => depth + 1,
            EntryKind::GroupEnd => depth.saturating_sub(1),
            EntryKind::Log => depth,
        })
    }

    fn record(&self, kind: EntryKind, method: Option<ConsoleMethod>, format: &str, args: &[ConsoleArg]) {
        let mut entries = self.entries.lock();
        let depth = Self::current_depth(&entries);
        entries.push(ConsoleEntry {
            kind,
            method,
            format: format.to_string(),
            args: args.to_vec(),
            text: expand_format(format, args),
            depth,
        });
    }
}

impl Console for MemoryConsole {
    fn log(&self, method: ConsoleMethod, format: &str, args: &[ConsoleArg]) {
        self.record(EntryKind::Log, Some(method), format, args);
    }

    fn write(&self, level: Level, payload: &MessageFormat) {
        let _emission = self.emission.lock();
        write_message(self, level, payload);
    }

    fn supports_groups(&self) -> bool {
        self.groups
    }

    fn group_collapsed(&self, format: &str, args: &[ConsoleArg]) {
        self.record(EntryKind::GroupStart, None, format, args);
    }

    fn group_end(&self) {
        self.record(EntryKind::GroupEnd, None, "", &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_group_depth() {
        let console = MemoryConsole::new();
        console.group_collapsed("%s", &["head".into()]);
        console.log(ConsoleMethod::Info, "%s", &["inner".into()]);
        console.group_end();
        console.log(ConsoleMethod::Info, "%s", &["outer".into()]);

        let depths: Vec<usize> = console.entries().iter().map(|e| e.depth).collect();
        assert_eq!(depths, [0, 1, 1, 0]);
        assert_eq!(console.lines(), ["head", "inner", "outer"]);
    }
}
