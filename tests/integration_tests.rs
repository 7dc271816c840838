//! Integration tests for the logging pipeline
//!
//! These tests verify:
//! - Per-name level filtering and the global default
//! - Field merge precedence across ambient, bound, and per-call fields
//! - Hook dispatch under sync and async drivers
//! - Sink failures never reaching the caller
//! - The process-wide API

use parking_lot::Mutex;
use rust_field_logger::prelude::*;
use rust_field_logger::{fields, info, LoggerError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn quiet_system() -> LogSystem {
    LogSystem::with_driver(Arc::new(SyncDriver::new(NullSink)))
}

fn capture(system: &LogSystem) -> Arc<Mutex<Vec<LogRecord>>> {
    let records = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&records);
    system.register_hook(move |r| sink.lock().push(r.clone()));
    records
}

fn count_by_level(system: &LogSystem) -> Arc<Mutex<HashMap<Level, usize>>> {
    let counts = Arc::new(Mutex::new(HashMap::new()));
    let sink = Arc::clone(&counts);
    system.register_hook(move |r| *sink.lock().entry(r.level).or_insert(0) += 1);
    counts
}

#[test]
fn test_logger_level_filter() {
    let system = quiet_system();
    system.set_level(Level::Warn);
    system.set_logger_level("debug", Level::Debug);
    system.set_logger_level_map([("info", Level::Info), ("error", Level::Error)]);

    let debug_log = system.logger("debug");
    let info_log = system.logger("info");
    let error_log = system.logger("error");
    let tmp_log = system.logger("xxxxx");

    let counts = count_by_level(&system);

    debug_log.trace("debug.trace, invisible");
    debug_log.debug("debug.debug, visible");

    info_log.debug("info.debug, invisible");
    info_log.info("info.info, visible");
    info_log.error("info.error, visible");

    error_log.info("error.info, invisible");
    error_log.warn("error.warn, invisible");
    error_log.error("error.error, visible");

    tmp_log.info("tmp.info, invisible");
    tmp_log.warn("tmp.warn, visible");
    tmp_log.error("tmp.error, visible");

    let counts = counts.lock();
    assert_eq!(counts.get(&Level::Debug), Some(&1));
    assert_eq!(counts.get(&Level::Info), Some(&1));
    assert_eq!(counts.get(&Level::Warn), Some(&1));
    assert_eq!(counts.get(&Level::Error), Some(&3));
    assert_eq!(counts.get(&Level::Trace), None);
}

#[test]
fn test_override_only_affects_exact_name() {
    let system = quiet_system();
    system.set_level(Level::Info);
    system.set_logger_level("noisy", Level::Error);

    assert_eq!(system.effective_level("noisy"), Level::Error);
    for name in ["quiet", "noisy.child", "other", ""] {
        assert_eq!(system.effective_level(name), Level::Info, "name {:?}", name);
    }
}

#[test]
fn test_warn_threshold_scenario() {
    let system = quiet_system();
    system.set_level(Level::Warn);
    let counts = count_by_level(&system);
    let log = system.logger("scenario");

    log.debug("d");
    log.info("i");
    log.warn("w");
    log.error("e");

    let counts = counts.lock();
    assert_eq!(counts.values().sum::<usize>(), 2);
    assert_eq!(counts.get(&Level::Warn), Some(&1));
    assert_eq!(counts.get(&Level::Error), Some(&1));
}

#[test]
fn test_field_precedence_end_to_end() {
    let system = quiet_system();
    let records = capture(&system);

    system.set_context_field("a", 1);
    let bound = system.logger("svc").bind_fields(fields! { "a" => 2 });

    bound.info_with("per-call", &fields! { "a" => 3 });
    bound.info("bound");
    system.logger("svc").info("ambient");

    let values: Vec<FieldValue> = records
        .lock()
        .iter()
        .map(|r| r.fields.get("a").cloned().unwrap())
        .collect();
    assert_eq!(
        values,
        vec![FieldValue::Int(3), FieldValue::Int(2), FieldValue::Int(1)]
    );
}

#[test]
fn test_context_fields_lifecycle() {
    let system = quiet_system();
    let records = capture(&system);
    let log = system.root();

    log.info("no fields");

    system.set_context_field("uid", 17u64);
    system.set_context_fields(&fields! { "admin" => true, "username" => "jackson" });
    log.info("with uid, admin, username");

    let bound = log.bind_fields(fields! { "tid" => "bytedance" });
    bound.info("with tid");

    system.del_context_field("uid");
    bound.info("no uid");

    let records = records.lock();
    assert!(records[0].fields.is_empty());
    assert_eq!(records[1].fields.len(), 3);
    assert_eq!(records[2].fields.len(), 4);
    assert_eq!(records[3].fields.len(), 3);
    assert!(!records[3].fields.contains_key("uid"));

    // Already delivered records keep the removed field
    assert_eq!(records[1].fields.get("uid"), Some(&FieldValue::UInt(17)));
}

#[test]
fn test_scoped_context_field() {
    let system = quiet_system();
    let records = capture(&system);

    {
        let _guard = system.scoped_context_field("request_id", "abc-123");
        system.root().info("inside");
    }
    system.root().info("outside");

    let records = records.lock();
    assert!(records[0].fields.contains_key("request_id"));
    assert!(!records[1].fields.contains_key("request_id"));
}

#[test]
fn test_record_carries_name_and_message() {
    let system = quiet_system();
    let records = capture(&system);

    info!(system.logger("http"), "GET {} -> {}", "/health", 200);

    let records = records.lock();
    assert_eq!(records[0].logger, "http");
    assert_eq!(records[0].message, "GET /health -> 200");
    assert_eq!(records[0].level, Level::Info);
}

#[test]
fn test_async_logger_end_to_end() {
    let system = quiet_system();
    let records = capture(&system);
    let driver: Arc<dyn Driver> = Arc::new(AsyncDriver::new(NullSink).unwrap());
    system.set_shared_driver(Arc::clone(&driver));

    let log = system.root();
    log.info("no fields");
    system.set_context_field("uid", 99u64);
    log.bind_fields(fields! { "tid" => "bytedance" }).info("bound");
    system.del_context_field("uid");
    log.info("no uid");

    assert!(system.flush(Duration::from_secs(5)));

    let records = records.lock();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].fields.len(), 2);
    assert!(records[2].fields.is_empty());
    assert_eq!(driver.metrics().delivered_count(), 3);
}

#[test]
fn test_async_hooks_run_off_the_emitting_thread() {
    let system = quiet_system();
    system.set_driver(AsyncDriver::new(NullSink).unwrap());
    let emitting = std::thread::current().id();
    let same_thread = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));

    let (same_clone, calls_clone) = (Arc::clone(&same_thread), Arc::clone(&calls));
    system.register_hook(move |_| {
        if std::thread::current().id() == emitting {
            same_clone.fetch_add(1, Ordering::SeqCst);
        }
        calls_clone.fetch_add(1, Ordering::SeqCst);
    });

    for i in 0..10 {
        system.root().info(format!("m{}", i));
    }
    assert!(system.flush(Duration::from_secs(5)));

    assert_eq!(calls.load(Ordering::SeqCst), 10);
    assert_eq!(same_thread.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fatal_from_async_hook_runs_handler_promptly() {
    let system = quiet_system();
    system.set_driver(AsyncDriver::new(NullSink).unwrap());
    let handled = Arc::new(AtomicUsize::new(0));
    let handled_clone = Arc::clone(&handled);
    system.set_fatal_handler(move |_| {
        handled_clone.fetch_add(1, Ordering::SeqCst);
    });

    let hook_system = system.clone();
    system.register_hook(move |r| {
        if r.message == "trigger" {
            hook_system.logger("hook").fatal("fatal from hook");
        }
    });

    let start = Instant::now();
    system.root().info("trigger");
    assert!(system.flush(Duration::from_secs(10)));

    assert_eq!(handled.load(Ordering::SeqCst), 1);
    assert!(start.elapsed() < Duration::from_secs(2));

    // The hook holds a clone of the system
    system.hooks().clear();
}

#[test]
fn test_sink_failure_is_contained() {
    struct FailingSink {
        attempts: Arc<AtomicUsize>,
    }

    impl Sink for FailingSink {
        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(LoggerError::writer("Simulated failure"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    let attempts = Arc::new(AtomicUsize::new(0));
    let driver: Arc<dyn Driver> = Arc::new(SyncDriver::new(FailingSink {
        attempts: Arc::clone(&attempts),
    }));
    let system = LogSystem::with_driver(Arc::clone(&driver));
    let records = capture(&system);

    for _ in 0..5 {
        system.root().error("cannot be written");
    }

    assert_eq!(attempts.load(Ordering::SeqCst), 5);
    assert_eq!(driver.metrics().sink_failures(), 5);
    assert_eq!(records.lock().len(), 5);
}

#[test]
fn test_panicking_sink_is_contained() {
    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    let system = LogSystem::with_driver(Arc::new(AsyncDriver::new(PanickingSink).unwrap()));
    let records = capture(&system);

    system.root().info("one");
    system.root().info("two");
    assert!(system.flush(Duration::from_secs(5)));
    assert_eq!(records.lock().len(), 2);
}

#[test]
fn test_hooks_fire_in_registration_order() {
    let system = quiet_system();
    let order = Arc::new(Mutex::new(Vec::new()));
    for id in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        system.register_hook(move |_| order.lock().push(id));
    }

    system.root().warn("x");
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

mod global_api {
    use super::*;
    use once_cell::sync::Lazy;

    /// The process-wide system is shared by every test in this binary
    static GLOBAL_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn test_default_logger_functions() {
        let _lock = GLOBAL_LOCK.lock();
        rust_field_logger::reset();
        rust_field_logger::set_driver(SyncDriver::new(NullSink));

        let counts = Arc::new(AtomicUsize::new(0));
        let counts_clone = Arc::clone(&counts);
        rust_field_logger::register_hook(move |_| {
            counts_clone.fetch_add(1, Ordering::SeqCst);
        });

        rust_field_logger::set_level(Level::Trace);
        rust_field_logger::trace("are you pretty?");
        rust_field_logger::debug("okkkkkk");
        info!("i'm {:010}", 18);
        rust_field_logger::warn("you aren't honest!");
        rust_field_logger::error("what?");
        assert_eq!(counts.load(Ordering::SeqCst), 5);

        rust_field_logger::set_level(Level::Error);
        rust_field_logger::info("filtered");
        assert_eq!(counts.load(Ordering::SeqCst), 5);

        rust_field_logger::reset();
    }

    #[test]
    fn test_named_loggers_share_level() {
        let _lock = GLOBAL_LOCK.lock();
        rust_field_logger::reset();
        rust_field_logger::set_driver(SyncDriver::new(NullSink));

        let a = rust_field_logger::new_logger("shared");
        let b = rust_field_logger::new_logger("shared");
        rust_field_logger::set_logger_level("shared", Level::Error);

        assert_eq!(a.effective_level(), Level::Error);
        assert_eq!(b.effective_level(), Level::Error);
        assert_eq!(rust_field_logger::get_logger().effective_level(), Level::Trace);

        rust_field_logger::reset();
    }

    #[test]
    fn test_enable_async_driver_then_switch_back() {
        let _lock = GLOBAL_LOCK.lock();
        rust_field_logger::reset();

        let counts = Arc::new(AtomicUsize::new(0));
        let counts_clone = Arc::clone(&counts);
        rust_field_logger::register_hook(move |_| {
            counts_clone.fetch_add(1, Ordering::SeqCst);
        });

        rust_field_logger::enable_async_driver().unwrap();
        rust_field_logger::set_level(Level::Panic);
        rust_field_logger::info("filtered, nothing printed");
        let previous = rust_field_logger::set_driver(SyncDriver::new(NullSink));

        assert_eq!(previous.name(), "async");
        assert_eq!(counts.load(Ordering::SeqCst), 0);

        rust_field_logger::reset();
    }
}
