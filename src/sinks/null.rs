//! Sink that discards every record

use crate::core::{LogRecord, Result, Sink};

/// Discards records. Hooks still fire, which makes this the sink of choice
/// for benchmarks and load tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, _record: &LogRecord) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
