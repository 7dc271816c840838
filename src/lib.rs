//! # Rust Field Logger
//!
//! A structured, leveled logging engine: named loggers with per-name level
//! overrides, ambient context fields merged into every record, observer
//! hooks, and a swappable synchronous or asynchronous driver.
//!
//! ## Features
//!
//! - **Per-name levels**: one global default plus exact-name overrides, read
//!   live on every emission
//! - **Structured fields**: ambient, logger-bound, and per-call fields with
//!   fixed precedence (per-call > bound > ambient)
//! - **Async driver**: bounded queue with an explicit overflow policy and a
//!   single worker thread
//! - **Hooks**: observers invoked once per delivered record, in registration
//!   order
//!
//! ## Example
//!
//! ```
//! use rust_field_logger::prelude::*;
//! use rust_field_logger::sinks::NullSink;
//!
//! let system = LogSystem::new();
//! system.set_driver(SyncDriver::new(NullSink));
//! system.set_level(Level::Warn);
//! system.set_logger_level("db", Level::Debug);
//! system.set_context_field("service", "billing");
//!
//! let db = system.logger("db").bind_fields(Fields::new().with("pool", "primary"));
//! db.debug("connection acquired");
//! rust_field_logger::info!(db, "query took {}ms", 12);
//! ```

pub mod core;
pub mod drivers;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ContextGuard, Driver, DriverMetrics, FieldValue, Fields, Hook, Level, LogPriority,
        LogRecord, LogSystem, Logger, LoggerError, OverflowCallback, OverflowPolicy, Result, Sink,
        DEFAULT_FLUSH_TIMEOUT,
    };
    pub use crate::drivers::{AsyncDriver, SyncDriver};
    pub use crate::sinks::{ConsoleSink, NullSink};
}

pub use crate::core::{
    ContextGuard, ContextStore, Driver, DriverMetrics, FatalHandler, FieldValue, Fields, Hook,
    HookDispatch, Level, LevelRegistry, LogPriority, LogRecord, LogSystem, Logger, LoggerError,
    OverflowCallback, OverflowPolicy, Result, Sink, DEFAULT_FLUSH_TIMEOUT,
};
pub use drivers::{
    AsyncDriver, AsyncDriverBuilder, SyncDriver, DEFAULT_CRITICAL_WRITE_TIMEOUT,
    DEFAULT_QUEUE_CAPACITY,
};
pub use global::*;
