//! Observer hooks invoked once per delivered record

use super::record::LogRecord;
use parking_lot::RwLock;
use std::sync::Arc;

/// Observer callback. Runs on whichever thread delivers the record: the
/// emitting thread under the sync driver, the worker under the async driver.
///
/// A hook must not block; there is no timeout and a slow hook stalls or backs
/// up the pipeline.
pub type Hook = Arc<dyn Fn(&LogRecord) + Send + Sync>;

/// Ordered hook list, invoked in registration order
#[derive(Default)]
pub struct HookDispatch {
    hooks: RwLock<Arc<Vec<Hook>>>,
}

impl HookDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: Hook) {
        let mut hooks = self.hooks.write();
        Arc::make_mut(&mut hooks).push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    pub fn clear(&self) {
        *self.hooks.write() = Arc::new(Vec::new());
    }

    /// Invoke every hook with `record`
    ///
    /// Hooks registered while a dispatch is running are picked up by the next
    /// record. A panicking hook is reported and the remaining hooks still run.
    pub fn dispatch(&self, record: &LogRecord) {
        let hooks = Arc::clone(&self.hooks.read());
        for (idx, hook) in hooks.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| hook(record)));
            if let Err(panic_info) = result {
                eprintln!(
                    "[LOGGER CRITICAL] Hook #{} panicked: {}. Other hooks continue to run.",
                    idx,
                    panic_message(panic_info.as_ref())
                );
            }
        }
    }
}

impl std::fmt::Debug for HookDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookDispatch")
            .field("hooks", &self.len())
            .finish()
    }
}

/// Extract a printable message from a `catch_unwind` payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
