//! Outputs a logger fans each line out to.
//!
//! A transport receives the finished `LogRecord`. `ConsoleTransport` pairs a
//! formatter with a console; other transports can ship records anywhere
//! without going through a formatter.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tintlog_core::LogRecord;

use crate::console::Console;
use crate::formatter::Formatter;

pub trait Transport: Send + Sync {
    fn log(&self, record: &LogRecord);

    /// The formatter this transport renders with, if it has one.
    fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        None
    }

    /// Swaps the formatter. Transports without one ignore this.
    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        let _ = formatter;
    }
}

/// Renders records with a formatter and writes them to a console.
pub struct ConsoleTransport {
    formatter: RwLock<Arc<dyn Formatter>>,
    console: Arc<dyn Console>,
}

impl ConsoleTransport {
    pub fn new(formatter: Arc<dyn Formatter>, console: Arc<dyn Console>) -> Self {
        Self {
            formatter: RwLock::new(formatter),
            console,
        }
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }
}

impl Transport for ConsoleTransport {
    fn log(&self, record: &LogRecord) {
        let formatter = self.formatter.read().clone();
        formatter.render(record, self.console.as_ref());
    }

    fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        Some(self.formatter.read().clone())
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        *self.formatter.write() = formatter;
    }
}

impl fmt::Debug for ConsoleTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleTransport")
            .field("layout", &self.formatter.read().field_layout())
            .finish_non_exhaustive()
    }
}
