//! Overflow policies for the async driver's bounded queue
//!
//! Logging under the async driver is best-effort. When the queue is full the
//! configured policy decides which record is lost; a producer is never parked
//! for longer than a `BlockWithTimeout` budget.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling queue overflow in async logging
///
/// # Example
///
/// ```
/// use rust_field_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: alert and drop the incoming record
/// let policy = OverflowPolicy::default();
///
/// // Wait briefly for space, then drop
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the incoming record and count it
    DropNewest,

    /// Evict the oldest queued record to make room for the incoming one
    DropOldest,

    /// Wait up to the given duration for space, then drop the incoming record
    BlockWithTimeout(Duration),

    /// Drop the incoming record, alerting on stderr and through the
    /// overflow callback on the first drop and every 1000th after
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Priority level for log preservation during overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum LogPriority {
    /// Trace, Debug, Info
    #[default]
    Normal = 0,
    /// Warn
    High = 1,
    /// Error, Fatal, Panic
    Critical = 2,
}

impl fmt::Display for LogPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogPriority::Normal => write!(f, "Normal"),
            LogPriority::High => write!(f, "High"),
            LogPriority::Critical => write!(f, "Critical"),
        }
    }
}

/// Callback type for overflow notifications
///
/// The parameter is the total count of dropped records so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
