//! Sink trait for log output destinations

use super::{error::Result, record::LogRecord};

/// Byte-level destination for finished records.
///
/// Encoding and transport belong to the sink. Drivers serialize access, so
/// `write` is never called concurrently on the same sink.
pub trait Sink: Send + Sync {
    fn write(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
