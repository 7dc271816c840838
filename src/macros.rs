//! Logging macros for formatted messages.
//!
//! Each level macro takes either a format string, logging through the
//! process-wide root logger, or a logger followed by a format string. The
//! level is checked before the message is formatted, so filtered calls cost
//! one level lookup.
//!
//! # Examples
//!
//! ```
//! use rust_field_logger::prelude::*;
//! use rust_field_logger::{info, warn};
//!
//! let system = LogSystem::new();
//! system.set_driver(SyncDriver::new(NullSink));
//! let logger = system.logger("server");
//!
//! let port = 8080;
//! info!(logger, "listening on port {}", port);
//! warn!(logger, "retry {} of {}", 3, 5);
//! ```

/// Log a formatted message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_field_logger::prelude::*;
/// # let system = LogSystem::new();
/// # system.set_driver(SyncDriver::new(NullSink));
/// # let logger = system.logger("app");
/// use rust_field_logger::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $fmt:literal $($arg:tt)*) => {{
        let system = $crate::LogSystem::global();
        let level = $level;
        if system.enabled("", level) {
            system.log_root(level, format!($fmt $($arg)*));
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, format!($($arg)+));
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::Level::Trace, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::Level::Debug, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_field_logger::prelude::*;
/// # let system = LogSystem::new();
/// # system.set_driver(SyncDriver::new(NullSink));
/// # let logger = system.logger("app");
/// use rust_field_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::Level::Info, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::Level::Warn, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::Level::Error, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the fatal handler.
#[macro_export]
macro_rules! fatal {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::Level::Fatal, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

/// Log a panic-level message, then panic with it.
#[macro_export]
macro_rules! log_panic {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::Level::Panic, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Panic, $($arg)+)
    };
}

/// Build a [`Fields`](crate::Fields) map.
///
/// # Examples
///
/// ```
/// use rust_field_logger::fields;
///
/// let fields = fields! { "admin" => true, "username" => "jackson" };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Fields::new()$(.with($key, $value))+
    };
}
