//! Named logger handle

use super::{fields::Fields, level::Level, system::LogSystem};
use std::sync::Arc;

/// Named emission handle
///
/// Obtained from [`LogSystem::logger`] (or [`crate::new_logger`]); handles for
/// the same name share the name's level override, read live on every call.
/// Bound fields belong to one handle and never change; [`bind_fields`]
/// derives a new handle instead.
///
/// [`bind_fields`]: Logger::bind_fields
///
/// # Example
///
/// ```
/// use rust_field_logger::{Fields, Level, LogSystem};
///
/// let system = LogSystem::new();
/// let db = system.logger("db");
/// let pooled = db.bind_fields(Fields::new().with("pool", "primary"));
///
/// system.set_logger_level("db", Level::Warn);
/// assert!(!pooled.enabled(Level::Info));
/// assert_eq!(pooled.bound_fields().len(), 1);
/// assert!(db.bound_fields().is_empty());
/// ```
#[derive(Clone)]
pub struct Logger {
    pub(crate) name: Arc<str>,
    bound: Arc<Fields>,
    system: LogSystem,
}

impl Logger {
    pub(crate) fn new(name: Arc<str>, system: LogSystem) -> Self {
        Self {
            name,
            bound: Arc::new(Fields::new()),
            system,
        }
    }

    /// Logger name; empty for the root logger
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bound_fields(&self) -> &Fields {
        &self.bound
    }

    /// Derive a logger with the same name whose bound fields are this
    /// logger's overlaid with `fields`
    #[must_use]
    pub fn bind_fields(&self, fields: Fields) -> Logger {
        let mut bound = (*self.bound).clone();
        bound.extend_from(&fields);
        Self {
            name: Arc::clone(&self.name),
            bound: Arc::new(bound),
            system: self.system.clone(),
        }
    }

    pub fn effective_level(&self) -> Level {
        self.system.effective_level(&self.name)
    }

    /// Whether a record at `level` would pass the filter right now
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.system.enabled(&self.name, level)
    }

    #[inline]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.system.emit(&self.name, &self.bound, level, message, None);
    }

    /// Log with per-call fields, which win over bound and ambient fields
    #[inline]
    pub fn log_with_fields(&self, level: Level, message: impl Into<String>, fields: &Fields) {
        self.system
            .emit(&self.name, &self.bound, level, message, Some(fields));
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    /// Log, flush the driver, then run the fatal handler (process exit by
    /// default)
    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::Fatal, message);
    }

    /// Log, flush the driver, then panic with the message
    #[inline]
    pub fn panic(&self, message: impl Into<String>) {
        self.log(Level::Panic, message);
    }

    #[inline]
    pub fn trace_with(&self, message: impl Into<String>, fields: &Fields) {
        self.log_with_fields(Level::Trace, message, fields);
    }

    #[inline]
    pub fn debug_with(&self, message: impl Into<String>, fields: &Fields) {
        self.log_with_fields(Level::Debug, message, fields);
    }

    #[inline]
    pub fn info_with(&self, message: impl Into<String>, fields: &Fields) {
        self.log_with_fields(Level::Info, message, fields);
    }

    #[inline]
    pub fn warn_with(&self, message: impl Into<String>, fields: &Fields) {
        self.log_with_fields(Level::Warn, message, fields);
    }

    #[inline]
    pub fn error_with(&self, message: impl Into<String>, fields: &Fields) {
        self.log_with_fields(Level::Error, message, fields);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("bound", &self.bound)
            .finish()
    }
}
