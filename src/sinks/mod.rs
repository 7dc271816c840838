//! Sink implementations

pub mod console;
pub mod null;

pub use console::{ConsoleSink, OutputFormat};
pub use null::NullSink;

pub use crate::core::Sink;
