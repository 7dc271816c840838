//! Synchronous driver: writes on the caller's thread

use crate::core::driver::{flush_sink, notify, write_record};
use crate::core::{Driver, DriverMetrics, HookDispatch, LogRecord, Sink};
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Writes each record inline and returns once the write attempt completes.
///
/// No buffering; records from one thread reach the sink in call order.
/// Hooks run on the emitting thread after the write.
pub struct SyncDriver {
    sink: Mutex<Box<dyn Sink>>,
    metrics: DriverMetrics,
}

impl SyncDriver {
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self::from_boxed(Box::new(sink))
    }

    pub fn from_boxed(sink: Box<dyn Sink>) -> Self {
        Self {
            sink: Mutex::new(sink),
            metrics: DriverMetrics::new(),
        }
    }

    /// Sync driver writing to the console, the process-wide default
    pub fn console() -> Self {
        Self::new(ConsoleSink::new())
    }
}

impl Default for SyncDriver {
    fn default() -> Self {
        Self::console()
    }
}

impl Driver for SyncDriver {
    fn submit(&self, record: Arc<LogRecord>, hooks: &Arc<HookDispatch>) {
        {
            let mut sink = self.sink.lock();
            write_record(sink.as_mut(), &record, &self.metrics);
        }
        notify(&record, hooks, &self.metrics);
    }

    fn flush(&self, timeout: Duration) -> bool {
        match self.sink.try_lock_for(timeout) {
            Some(mut sink) => flush_sink(sink.as_mut()),
            None => {
                eprintln!(
                    "[LOGGER WARNING] Sync driver flush timed out after {:?} waiting for the sink.",
                    timeout
                );
                false
            }
        }
    }

    fn name(&self) -> &str {
        "sync"
    }

    fn metrics(&self) -> &DriverMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Fields, Level, LoggerError, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct VecSink(Arc<Mutex<Vec<String>>>);

    impl Sink for VecSink {
        fn write(&mut self, record: &LogRecord) -> Result<()> {
            self.0.lock().push(record.message.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "vec"
        }
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            Err(LoggerError::writer("disk on fire"))
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::writer("disk on fire"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn record(message: &str) -> Arc<LogRecord> {
        Arc::new(LogRecord::new(Level::Info, "t", message.to_string(), Fields::new()))
    }

    #[test]
    fn test_sync_writes_in_order() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let driver = SyncDriver::new(VecSink(Arc::clone(&lines)));
        let hooks = Arc::new(HookDispatch::new());

        for i in 0..5 {
            driver.submit(record(&format!("m{}", i)), &hooks);
        }

        assert_eq!(*lines.lock(), vec!["m0", "m1", "m2", "m3", "m4"]);
        assert_eq!(driver.metrics().delivered_count(), 5);
        assert!(driver.flush(Duration::from_millis(10)));
    }

    #[test]
    fn test_sink_failure_does_not_propagate() {
        let driver = SyncDriver::new(FailingSink);
        let hooks = Arc::new(HookDispatch::new());
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        hooks.register(Arc::new(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        }));

        driver.submit(record("lost"), &hooks);

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(driver.metrics().sink_failures(), 1);
        assert!(!driver.flush(Duration::from_millis(10)));
    }

    #[test]
    fn test_hook_may_log_through_same_driver() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let driver = Arc::new(SyncDriver::new(VecSink(Arc::clone(&lines))));
        let hooks = Arc::new(HookDispatch::new());

        let inner_driver = Arc::clone(&driver);
        let inner_hooks = Arc::new(HookDispatch::new());
        hooks.register(Arc::new(move |r| {
            if r.message == "outer" {
                inner_driver.submit(record("from hook"), &inner_hooks);
            }
        }));

        driver.submit(record("outer"), &hooks);
        assert_eq!(*lines.lock(), vec!["outer", "from hook"]);
    }
}
