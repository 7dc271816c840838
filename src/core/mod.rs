//! Core logger types and traits

pub mod driver;
pub mod error;
pub mod fields;
pub mod hooks;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod record;
pub mod registry;
pub mod sink;
pub mod system;

pub use driver::{Driver, DEFAULT_FLUSH_TIMEOUT};
pub use error::{LoggerError, Result};
pub use fields::{ContextGuard, ContextStore, FieldValue, Fields};
pub use hooks::{Hook, HookDispatch};
pub use level::Level;
pub use logger::Logger;
pub use metrics::DriverMetrics;
pub use overflow_policy::{LogPriority, OverflowCallback, OverflowPolicy};
pub use record::LogRecord;
pub use registry::LevelRegistry;
pub use sink::Sink;
pub use system::{FatalHandler, LogSystem};
