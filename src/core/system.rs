//! Process-wide logging state and the emission path
//!
//! A [`LogSystem`] owns the level registry, the ambient context store, the
//! hook list, and the active driver. [`LogSystem::global`] is the lazily
//! initialized instance behind the crate's free functions; independent
//! instances from [`LogSystem::new`] are useful for embedding and tests.
//!
//! Initialization order of a fresh system: levels default to `Trace`, the
//! context and hook list are empty, and a [`SyncDriver`] writing to the
//! console is active.

use super::{
    driver::{Driver, DEFAULT_FLUSH_TIMEOUT},
    error::Result,
    fields::{ContextGuard, ContextStore, FieldValue, Fields},
    hooks::{Hook, HookDispatch},
    level::Level,
    logger::Logger,
    record::LogRecord,
    registry::LevelRegistry,
};
use crate::drivers::{AsyncDriver, SyncDriver};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Terminal action run after a `Fatal` record has been delivered and flushed
pub type FatalHandler = Arc<dyn Fn(&LogRecord) + Send + Sync>;

static GLOBAL: Lazy<LogSystem> = Lazy::new(LogSystem::new);

fn exit_process() -> FatalHandler {
    Arc::new(|_| std::process::exit(1))
}

struct SystemInner {
    levels: LevelRegistry,
    context: Arc<ContextStore>,
    hooks: Arc<HookDispatch>,
    driver: RwLock<Arc<dyn Driver>>,
    /// Interned logger names; handles for one name share the same `Arc<str>`
    names: RwLock<HashMap<String, Arc<str>>>,
    fatal_handler: RwLock<FatalHandler>,
}

/// Cheaply cloneable handle to one logging system
#[derive(Clone)]
pub struct LogSystem {
    inner: Arc<SystemInner>,
}

impl LogSystem {
    pub fn new() -> Self {
        Self::with_driver(Arc::new(SyncDriver::console()))
    }

    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        Self {
            inner: Arc::new(SystemInner {
                levels: LevelRegistry::new(Level::Trace),
                context: Arc::new(ContextStore::new()),
                hooks: Arc::new(HookDispatch::new()),
                driver: RwLock::new(driver),
                names: RwLock::new(HashMap::new()),
                fatal_handler: RwLock::new(exit_process()),
            }),
        }
    }

    /// The process-wide instance, created on first use
    pub fn global() -> &'static LogSystem {
        &GLOBAL
    }

    /// Create-or-get the logger for `name`; the empty name is the root logger
    pub fn logger(&self, name: &str) -> Logger {
        if let Some(interned) = self.inner.names.read().get(name) {
            return Logger::new(Arc::clone(interned), self.clone());
        }

        let mut names = self.inner.names.write();
        let interned = names
            .entry(name.to_string())
            .or_insert_with(|| Arc::from(name));
        Logger::new(Arc::clone(interned), self.clone())
    }

    pub fn root(&self) -> Logger {
        self.logger("")
    }

    /// Names requested so far, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.names.read().keys().cloned().collect();
        names.sort();
        names
    }

    // ---- level policy ----

    pub fn set_level(&self, level: Level) {
        self.inner.levels.set_level(level);
    }

    pub fn level(&self) -> Level {
        self.inner.levels.default_level()
    }

    pub fn set_logger_level(&self, name: impl Into<String>, level: Level) {
        self.inner.levels.set_logger_level(name, level);
    }

    pub fn set_logger_level_map<I, K>(&self, levels: I)
    where
        I: IntoIterator<Item = (K, Level)>,
        K: Into<String>,
    {
        self.inner.levels.set_logger_level_map(levels);
    }

    pub fn clear_logger_level(&self, name: &str) {
        self.inner.levels.clear_logger_level(name);
    }

    pub fn effective_level(&self, name: &str) -> Level {
        self.inner.levels.effective_level(name)
    }

    #[inline]
    pub fn enabled(&self, name: &str, level: Level) -> bool {
        level >= self.inner.levels.effective_level(name)
    }

    // ---- ambient context ----

    pub fn context(&self) -> &ContextStore {
        &self.inner.context
    }

    pub fn set_context_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.inner.context.set(key, value);
    }

    pub fn set_context_fields(&self, fields: &Fields) {
        self.inner.context.set_many(fields);
    }

    pub fn del_context_field(&self, key: &str) {
        self.inner.context.remove(key);
    }

    /// Set an ambient field that is removed when the guard drops
    #[must_use = "the field is removed as soon as the guard is dropped"]
    pub fn scoped_context_field(
        &self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> ContextGuard {
        let key = key.into();
        self.inner.context.set(key.clone(), value);
        ContextGuard::new(Arc::clone(&self.inner.context), key)
    }

    // ---- hooks ----

    pub fn register_hook<F>(&self, hook: F)
    where
        F: Fn(&LogRecord) + Send + Sync + 'static,
    {
        self.inner.hooks.register(Arc::new(hook));
    }

    pub fn register_shared_hook(&self, hook: Hook) {
        self.inner.hooks.register(hook);
    }

    pub fn hooks(&self) -> &HookDispatch {
        &self.inner.hooks
    }

    // ---- driver ----

    /// Currently active driver
    pub fn driver(&self) -> Arc<dyn Driver> {
        Arc::clone(&self.inner.driver.read())
    }

    /// Install `driver`, flush the previous one, and return it
    pub fn set_driver<D: Driver + 'static>(&self, driver: D) -> Arc<dyn Driver> {
        self.set_shared_driver(Arc::new(driver))
    }

    /// Install a driver the caller keeps a handle to
    ///
    /// Records already accepted by the previous driver are still delivered
    /// by it; emissions that loaded the previous driver just before the swap
    /// are accepted by it as well.
    pub fn set_shared_driver(&self, driver: Arc<dyn Driver>) -> Arc<dyn Driver> {
        let previous = std::mem::replace(&mut *self.inner.driver.write(), driver);
        previous.flush(DEFAULT_FLUSH_TIMEOUT);
        previous
    }

    /// Switch to an [`AsyncDriver`] with default capacity writing to the console
    pub fn enable_async_driver(&self) -> Result<()> {
        self.set_driver(AsyncDriver::console()?);
        Ok(())
    }

    /// Flush the active driver, waiting at most `timeout`
    pub fn flush(&self, timeout: Duration) -> bool {
        self.driver().flush(timeout)
    }

    /// Replace the action taken after a `Fatal` record is delivered
    pub fn set_fatal_handler<F>(&self, handler: F)
    where
        F: Fn(&LogRecord) + Send + Sync + 'static,
    {
        *self.inner.fatal_handler.write() = Arc::new(handler);
    }

    /// Restore the initial state: `Trace` default, no overrides, no ambient
    /// fields, no hooks, a console sync driver, and process exit on `Fatal`.
    pub fn reset(&self) {
        self.inner.levels.reset(Level::Trace);
        self.inner.context.clear();
        self.inner.hooks.clear();
        self.set_driver(SyncDriver::console());
        *self.inner.fatal_handler.write() = exit_process();
    }

    // ---- emission ----

    /// Root-logger emission used by the crate-level functions and macros
    pub fn log_root(&self, level: Level, message: impl Into<String>) {
        self.emit("", &Fields::new(), level, message, None);
    }

    /// The single path every emission takes
    pub(crate) fn emit(
        &self,
        name: &str,
        bound: &Fields,
        level: Level,
        message: impl Into<String>,
        per_call: Option<&Fields>,
    ) {
        if level < self.inner.levels.effective_level(name) {
            return;
        }

        let ambient = self.inner.context.snapshot();
        let fields = LogRecord::merge_fields(&ambient, bound, per_call);
        let record = Arc::new(LogRecord::new(level, name, message.into(), fields));

        let driver = self.driver();
        driver.submit(Arc::clone(&record), &self.inner.hooks);

        match level {
            Level::Fatal => {
                driver.flush(DEFAULT_FLUSH_TIMEOUT);
                let handler = Arc::clone(&self.inner.fatal_handler.read());
                handler(&record);
            }
            Level::Panic => {
                driver.flush(DEFAULT_FLUSH_TIMEOUT);
                panic!("{}", record.message);
            }
            _ => {}
        }
    }
}

impl Default for LogSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSystem")
            .field("level", &self.level())
            .field("driver", &self.driver().name())
            .field("hooks", &self.inner.hooks.len())
            .finish()
    }
}
