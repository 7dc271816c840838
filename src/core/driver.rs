//! Driver trait and the shared delivery step

use super::{
    hooks::{panic_message, HookDispatch},
    metrics::DriverMetrics,
    record::LogRecord,
    sink::Sink,
};
use std::sync::Arc;
use std::time::Duration;

/// Default bound for [`Driver::flush`] during shutdown and before
/// `Fatal`/`Panic` termination
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivery mechanism that gets a finished record to a sink and then to the
/// hooks.
///
/// `submit` never fails back into the caller: sink errors are reported on
/// stderr and counted in [`metrics`](Driver::metrics).
pub trait Driver: Send + Sync {
    /// Accept `record` for delivery. `hooks` fire once the record has been
    /// written, on whichever thread performs the write.
    fn submit(&self, record: Arc<LogRecord>, hooks: &Arc<HookDispatch>);

    /// Wait up to `timeout` for accepted records to be delivered, then flush
    /// the sink. Returns `false` if the wait timed out or the sink failed.
    fn flush(&self, timeout: Duration) -> bool;

    fn name(&self) -> &str;

    fn metrics(&self) -> &DriverMetrics;
}

/// Write `record` to `sink`, isolating sink errors and sink panics.
///
/// Callers dispatch hooks afterwards, outside any sink lock, so a hook that
/// logs again cannot deadlock on the sink.
pub(crate) fn write_record(sink: &mut dyn Sink, record: &LogRecord, metrics: &DriverMetrics) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.write(record)));

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
            metrics.record_sink_failure();
        }
        Err(panic_info) => {
            eprintln!(
                "[LOGGER CRITICAL] Sink '{}' panicked: {}",
                sink.name(),
                panic_message(panic_info.as_ref())
            );
            metrics.record_sink_failure();
        }
    }
}

/// Hand an accepted record to the hooks and count it delivered
pub(crate) fn notify(record: &LogRecord, hooks: &HookDispatch, metrics: &DriverMetrics) {
    hooks.dispatch(record);
    metrics.record_delivered();
}

/// Flush `sink`, reporting instead of propagating failures
pub(crate) fn flush_sink(sink: &mut dyn Sink) -> bool {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));

    match result {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.name(), e);
            false
        }
        Err(panic_info) => {
            eprintln!(
                "[LOGGER CRITICAL] Sink '{}' panicked during flush: {}",
                sink.name(),
                panic_message(panic_info.as_ref())
            );
            false
        }
    }
}
