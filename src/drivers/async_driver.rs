//! Asynchronous driver: bounded queue drained by one worker thread

use crate::core::driver::{flush_sink, notify, write_record, DEFAULT_FLUSH_TIMEOUT};
use crate::core::{
    Driver, DriverMetrics, HookDispatch, LogPriority, LogRecord, LoggerError, OverflowCallback,
    OverflowPolicy, Result, Sink,
};
use crate::sinks::ConsoleSink;
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Default wait for the sink when writing a critical record inline
pub const DEFAULT_CRITICAL_WRITE_TIMEOUT: Duration = Duration::from_millis(250);

const WORKER_NAME: &str = "log-async-worker";

/// Maximum records the worker pulls before writing and flushing the sink
const BATCH_SIZE: usize = 64;

/// Evict-then-retry attempts under `DropOldest` before giving up on a record
const DROP_OLDEST_RETRIES: usize = 4;

struct Envelope {
    record: Arc<LogRecord>,
    hooks: Arc<HookDispatch>,
}

/// State shared between producers and the worker
struct Shared {
    sink: Mutex<Box<dyn Sink>>,
    metrics: DriverMetrics,
    /// Records accepted but not yet handed to hooks
    pending: AtomicUsize,
}

impl Shared {
    fn process_batch(&self, batch: &mut Vec<Envelope>) {
        {
            let mut sink = self.sink.lock();
            for envelope in batch.iter() {
                write_record(sink.as_mut(), &envelope.record, &self.metrics);
            }
            flush_sink(sink.as_mut());
        }

        for envelope in batch.drain(..) {
            notify(&envelope.record, &envelope.hooks, &self.metrics);
            self.pending.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// Enqueues records into a bounded FIFO and returns immediately; a single
/// background worker writes them to the sink and then runs the hooks.
///
/// Records from one producer thread are delivered in submission order. When
/// the queue is full the [`OverflowPolicy`] decides what is lost. With
/// `preserve_critical` (the default), Error, Fatal, and Panic records that
/// find the queue full, or that `DropOldest` would evict, are written inline
/// on the caller's thread instead. The inline write waits at most
/// `critical_write_timeout` for the sink; a sink held longer than that (stuck
/// in the worker) turns the record into a counted drop.
///
/// Dropping the driver closes the queue and waits up to
/// [`DEFAULT_FLUSH_TIMEOUT`] for the worker to drain it.
///
/// # Example
///
/// ```
/// use rust_field_logger::drivers::AsyncDriver;
/// use rust_field_logger::sinks::NullSink;
/// use rust_field_logger::OverflowPolicy;
///
/// let driver = AsyncDriver::builder()
///     .capacity(1000)
///     .overflow_policy(OverflowPolicy::DropOldest)
///     .sink(NullSink)
///     .build()
///     .unwrap();
///
/// assert_eq!(driver.capacity(), 1024);
/// ```
pub struct AsyncDriver {
    shared: Arc<Shared>,
    sender: Option<Sender<Envelope>>,
    /// Producer-side receiver used to evict the oldest record under `DropOldest`
    evictor: Option<Receiver<Envelope>>,
    worker: Option<thread::JoinHandle<()>>,
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    preserve_critical: bool,
    critical_write_timeout: Duration,
}

impl AsyncDriver {
    /// Async driver with default settings writing to `sink`
    pub fn new<S: Sink + 'static>(sink: S) -> Result<Self> {
        Self::builder().sink(sink).build()
    }

    /// Async driver with default settings writing to the console
    pub fn console() -> Result<Self> {
        Self::builder().build()
    }

    #[must_use]
    pub fn builder() -> AsyncDriverBuilder {
        AsyncDriverBuilder::new()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn overflow_policy(&self) -> &OverflowPolicy {
        &self.overflow_policy
    }

    /// Records accepted but not yet delivered
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Records sitting in the queue, not yet taken by the worker
    pub fn queue_len(&self) -> usize {
        self.sender.as_ref().map_or(0, |sender| sender.len())
    }

    /// Close the queue and wait up to `timeout` for the worker to drain it
    ///
    /// Records submitted afterwards are discarded. Returns `true` if the
    /// worker finished and the final sink flush succeeded.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.sender.take());
        drop(self.evictor.take());

        let mut drained = true;
        if let Some(handle) = self.worker.take() {
            if handle.thread().id() == thread::current().id() {
                // Dropped from inside a hook; the worker exits on its own once
                // the queue is empty.
                return false;
            }

            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}", e);
                        drained = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Async worker thread did not finish within {:?}. \
                         Some logs may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(1));
            }
        }

        let mut sink = self.shared.sink.lock();
        flush_sink(sink.as_mut()) && drained
    }

    fn handle_overflow(&self, sender: &Sender<Envelope>, envelope: Envelope) {
        self.shared.metrics.record_queue_full();

        if self.is_preserved(&envelope) {
            self.force_write(envelope);
            return;
        }

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.discard(envelope);
            }

            OverflowPolicy::DropOldest => {
                self.evict_oldest(sender, envelope);
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.shared.metrics.record_block();
                match sender.send_timeout(envelope, *timeout) {
                    Ok(()) => {}
                    Err(SendTimeoutError::Timeout(envelope)) => {
                        let dropped = self.discard(envelope);
                        self.alert(dropped);
                    }
                    Err(SendTimeoutError::Disconnected(_)) => {
                        self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                    }
                }
            }

            OverflowPolicy::AlertAndDrop => {
                let dropped = self.discard(envelope);
                self.alert(dropped);
            }
        }
    }

    fn evict_oldest(&self, sender: &Sender<Envelope>, mut envelope: Envelope) {
        for _ in 0..DROP_OLDEST_RETRIES {
            if let Some(ref evictor) = self.evictor {
                if let Ok(oldest) = evictor.try_recv() {
                    if self.is_preserved(&oldest) {
                        self.force_write(oldest);
                    } else {
                        self.discard(oldest);
                    }
                }
            }

            match sender.try_send(envelope) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => envelope = rejected,
                Err(TrySendError::Disconnected(_)) => {
                    self.shared.pending.fetch_sub(1, Ordering::AcqRel);
                    return;
                }
            }
        }

        // Other producers refilled every freed slot
        self.discard(envelope);
    }

    fn is_preserved(&self, envelope: &Envelope) -> bool {
        self.preserve_critical && envelope.record.level.priority() == LogPriority::Critical
    }

    /// Write a critical record on the caller's thread, or drop it if the sink
    /// stays busy past `critical_write_timeout`
    fn force_write(&self, envelope: Envelope) {
        let written = match self.shared.sink.try_lock_for(self.critical_write_timeout) {
            Some(mut sink) => {
                write_record(sink.as_mut(), &envelope.record, &self.shared.metrics);
                true
            }
            None => false,
        };

        if !written {
            eprintln!(
                "[LOGGER ERROR] Sink busy for {:?}, dropping {} record from '{}'.",
                self.critical_write_timeout, envelope.record.level, envelope.record.logger
            );
            let dropped = self.discard(envelope);
            self.alert(dropped);
            return;
        }

        self.shared.metrics.record_critical_preserved();
        notify(&envelope.record, &envelope.hooks, &self.shared.metrics);
        self.shared.pending.fetch_sub(1, Ordering::AcqRel);
    }

    fn on_worker_thread(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| handle.thread().id() == thread::current().id())
    }

    /// Drop a record; returns the previous dropped count
    fn discard(&self, envelope: Envelope) -> u64 {
        drop(envelope);
        self.shared.pending.fetch_sub(1, Ordering::AcqRel);
        self.shared.metrics.record_dropped()
    }

    /// Alert on the first drop and every 1000th thereafter
    fn alert(&self, previous_dropped: u64) {
        let total = previous_dropped + 1;
        if previous_dropped == 0 || total % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Queue full, {} logs dropped. \
                 Consider increasing capacity (currently {}) or using a different overflow policy.",
                total, self.capacity
            );

            if let Some(ref callback) = self.on_overflow {
                callback(total);
            }
        }
    }
}

impl Driver for AsyncDriver {
    fn submit(&self, record: Arc<LogRecord>, hooks: &Arc<HookDispatch>) {
        let Some(ref sender) = self.sender else {
            return;
        };

        let envelope = Envelope {
            record,
            hooks: Arc::clone(hooks),
        };

        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        match sender.try_send(envelope) {
            Ok(()) => {}
            Err(TrySendError::Full(envelope)) => self.handle_overflow(sender, envelope),
            Err(TrySendError::Disconnected(_)) => {
                self.shared.pending.fetch_sub(1, Ordering::AcqRel);
            }
        }
    }

    /// Called from a hook on the worker thread, the queue cannot drain while
    /// the caller waits, so only the sink is flushed.
    fn flush(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        while !self.on_worker_thread() && self.shared.pending.load(Ordering::Acquire) > 0 {
            if Instant::now() >= deadline {
                eprintln!(
                    "[LOGGER WARNING] Async driver flush timed out after {:?} with {} records pending.",
                    timeout,
                    self.shared.pending.load(Ordering::Acquire)
                );
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        match self.shared.sink.try_lock_for(remaining) {
            Some(mut sink) => flush_sink(sink.as_mut()),
            None => false,
        }
    }

    fn name(&self) -> &str {
        "async"
    }

    fn metrics(&self) -> &DriverMetrics {
        &self.shared.metrics
    }
}

impl Drop for AsyncDriver {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_FLUSH_TIMEOUT);

        let dropped = self.shared.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Async driver shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.shared.metrics.drop_rate()
            );
        }
    }
}

/// Builder for [`AsyncDriver`]
///
/// # Example
/// ```
/// use rust_field_logger::drivers::AsyncDriver;
/// use rust_field_logger::sinks::NullSink;
/// use rust_field_logger::OverflowPolicy;
/// use std::sync::Arc;
///
/// let driver = AsyncDriver::builder()
///     .capacity(256)
///     .overflow_policy(OverflowPolicy::AlertAndDrop)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} logs dropped", count);
///     }))
///     .sink(NullSink)
///     .build()
///     .unwrap();
/// ```
pub struct AsyncDriverBuilder {
    capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    preserve_critical: bool,
    critical_write_timeout: Duration,
    sink: Option<Box<dyn Sink>>,
}

impl AsyncDriverBuilder {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
            preserve_critical: true,
            critical_write_timeout: DEFAULT_CRITICAL_WRITE_TIMEOUT,
            sink: None,
        }
    }

    /// Queue capacity, rounded up to the next power of two
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Callback invoked with the running drop total when alerting
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Write Error/Fatal/Panic records inline instead of dropping them
    #[must_use = "builder methods return a new value"]
    pub fn preserve_critical(mut self, preserve: bool) -> Self {
        self.preserve_critical = preserve;
        self
    }

    /// Longest wait for the sink when writing a critical record inline
    #[must_use = "builder methods return a new value"]
    pub fn critical_write_timeout(mut self, timeout: Duration) -> Self {
        self.critical_write_timeout = timeout;
        self
    }

    /// Destination; defaults to [`ConsoleSink`]
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Result<AsyncDriver> {
        if self.capacity == 0 {
            return Err(LoggerError::config(
                "AsyncDriver",
                "queue capacity must be non-zero",
            ));
        }
        let capacity = self.capacity.checked_next_power_of_two().ok_or_else(|| {
            LoggerError::config("AsyncDriver", format!("queue capacity {} too large", self.capacity))
        })?;

        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(ConsoleSink::new()));
        let shared = Arc::new(Shared {
            sink: Mutex::new(sink),
            metrics: DriverMetrics::new(),
            pending: AtomicUsize::new(0),
        });

        let (sender, receiver) = bounded::<Envelope>(capacity);
        let evictor = match self.overflow_policy {
            OverflowPolicy::DropOldest => Some(receiver.clone()),
            _ => None,
        };

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let mut batch = Vec::with_capacity(BATCH_SIZE);
                while let Ok(first) = receiver.recv() {
                    batch.push(first);
                    while batch.len() < BATCH_SIZE {
                        match receiver.try_recv() {
                            Ok(envelope) => batch.push(envelope),
                            Err(_) => break,
                        }
                    }
                    worker_shared.process_batch(&mut batch);
                }
            })
            .map_err(|e| LoggerError::worker_spawn(WORKER_NAME, e.to_string()))?;

        Ok(AsyncDriver {
            shared,
            sender: Some(sender),
            evictor,
            worker: Some(worker),
            capacity,
            overflow_policy: self.overflow_policy,
            on_overflow: self.on_overflow,
            preserve_critical: self.preserve_critical,
            critical_write_timeout: self.critical_write_timeout,
        })
    }
}

impl Default for AsyncDriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
