//! Process-wide API over [`LogSystem::global`]
//!
//! The emission functions here log through the root (empty-name) logger.

use crate::core::{Driver, FieldValue, Fields, Level, LogRecord, LogSystem, Logger, Result};
use std::sync::Arc;
use std::time::Duration;

/// The root logger
pub fn get_logger() -> Logger {
    LogSystem::global().root()
}

/// Create-or-get the logger for `name`
pub fn new_logger(name: &str) -> Logger {
    LogSystem::global().logger(name)
}

pub fn set_level(level: Level) {
    LogSystem::global().set_level(level);
}

pub fn set_logger_level(name: impl Into<String>, level: Level) {
    LogSystem::global().set_logger_level(name, level);
}

pub fn set_logger_level_map<I, K>(levels: I)
where
    I: IntoIterator<Item = (K, Level)>,
    K: Into<String>,
{
    LogSystem::global().set_logger_level_map(levels);
}

pub fn effective_level(name: &str) -> Level {
    LogSystem::global().effective_level(name)
}

pub fn set_context_field(key: impl Into<String>, value: impl Into<FieldValue>) {
    LogSystem::global().set_context_field(key, value);
}

pub fn set_context_fields(fields: &Fields) {
    LogSystem::global().set_context_fields(fields);
}

pub fn del_context_field(key: &str) {
    LogSystem::global().del_context_field(key);
}

pub fn register_hook<F>(hook: F)
where
    F: Fn(&LogRecord) + Send + Sync + 'static,
{
    LogSystem::global().register_hook(hook);
}

/// Install `driver` process-wide, returning the previous one after flushing it
pub fn set_driver<D: Driver + 'static>(driver: D) -> Arc<dyn Driver> {
    LogSystem::global().set_driver(driver)
}

pub fn enable_async_driver() -> Result<()> {
    LogSystem::global().enable_async_driver()
}

/// Flush the process-wide driver, waiting at most `timeout`
pub fn flush(timeout: Duration) -> bool {
    LogSystem::global().flush(timeout)
}

/// Restore the process-wide system to its initial state
pub fn reset() {
    LogSystem::global().reset();
}

pub fn log(level: Level, message: impl Into<String>) {
    LogSystem::global().log_root(level, message);
}

pub fn trace(message: impl Into<String>) {
    log(Level::Trace, message);
}

pub fn debug(message: impl Into<String>) {
    log(Level::Debug, message);
}

pub fn info(message: impl Into<String>) {
    log(Level::Info, message);
}

pub fn warn(message: impl Into<String>) {
    log(Level::Warn, message);
}

pub fn error(message: impl Into<String>) {
    log(Level::Error, message);
}

pub fn fatal(message: impl Into<String>) {
    log(Level::Fatal, message);
}

pub fn panic(message: impl Into<String>) {
    log(Level::Panic, message);
}
