//! Per-name level policy
//!
//! One global default plus exact-name overrides. The default lives in an
//! atomic so the common no-override path never takes a lock; overrides are
//! looked up on every emission, so a change is visible to the next call on
//! any handle with that name.

use super::level::Level;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[derive(Debug)]
pub struct LevelRegistry {
    default_level: AtomicU8,
    /// Set once any override exists; lets lookups skip the map entirely
    has_overrides: AtomicBool,
    overrides: RwLock<HashMap<String, Level>>,
}

impl LevelRegistry {
    pub fn new(default_level: Level) -> Self {
        Self {
            default_level: AtomicU8::new(default_level as u8),
            has_overrides: AtomicBool::new(false),
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_level(&self) -> Level {
        Level::from_u8(self.default_level.load(Ordering::Acquire))
    }

    pub fn set_level(&self, level: Level) {
        self.default_level.store(level as u8, Ordering::Release);
    }

    pub fn set_logger_level(&self, name: impl Into<String>, level: Level) {
        let mut overrides = self.overrides.write();
        overrides.insert(name.into(), level);
        self.has_overrides.store(true, Ordering::Release);
    }

    /// Merge a batch of overrides under a single write lock
    pub fn set_logger_level_map<I, K>(&self, levels: I)
    where
        I: IntoIterator<Item = (K, Level)>,
        K: Into<String>,
    {
        let mut overrides = self.overrides.write();
        overrides.extend(levels.into_iter().map(|(name, level)| (name.into(), level)));
        self.has_overrides.store(!overrides.is_empty(), Ordering::Release);
    }

    pub fn clear_logger_level(&self, name: &str) {
        let mut overrides = self.overrides.write();
        overrides.remove(name);
        self.has_overrides.store(!overrides.is_empty(), Ordering::Release);
    }

    /// Override for `name` if present, else the global default
    pub fn effective_level(&self, name: &str) -> Level {
        if self.has_overrides.load(Ordering::Acquire) {
            if let Some(level) = self.overrides.read().get(name) {
                return *level;
            }
        }
        self.default_level()
    }

    pub fn reset(&self, default_level: Level) {
        let mut overrides = self.overrides.write();
        overrides.clear();
        self.has_overrides.store(false, Ordering::Release);
        self.set_level(default_level);
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}
