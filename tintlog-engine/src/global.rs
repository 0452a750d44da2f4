//! The process-wide default logger.

use once_cell::sync::Lazy;

use crate::logger::Logger;

static GLOBAL: Lazy<Logger> = Lazy::new(Logger::new);

/// A logger built from the environment on first use. Prefer passing an
/// explicitly built `Logger` around; this one exists for convenience.
pub fn global() -> &'static Logger {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_the_same_instance() {
        let first = global() as *const Logger;
        let second = global() as *const Logger;
        assert_eq!(first, second);
        assert_eq!(global().name(), None);
    }
}
