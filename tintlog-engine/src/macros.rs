//! Logging macros: `info!(logger, message, field, field, ...)`.
//!
//! Each argument may be a `Field`, a bare value from `arg(..)`, or an
//! `Option` of either; `None` arguments are dropped, so
//! `cond.then(|| field(..))` omits a field.

#[doc(hidden)]
#[macro_export]
macro_rules! __tintlog_log {
    ($level:expr, $logger:expr, $message:expr $(, $field:expr)* $(,)?) => {{
        let args: ::std::vec::Vec<::core::option::Option<$crate::Arg>> =
            ::std::vec![$($crate::IntoArg::into_arg($field)),*];
        $logger.log($level, $message, args)
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__tintlog_log!($crate::Level::Trace, $logger, $($rest)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__tintlog_log!($crate::Level::Debug, $logger, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__tintlog_log!($crate::Level::Info, $logger, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__tintlog_log!($crate::Level::Warn, $logger, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__tintlog_log!($crate::Level::Error, $logger, $($rest)+)
    };
}
