//! Driver implementations

pub mod async_driver;
pub mod sync_driver;

pub use async_driver::{
    AsyncDriver, AsyncDriverBuilder, DEFAULT_CRITICAL_WRITE_TIMEOUT, DEFAULT_QUEUE_CAPACITY,
};
pub use sync_driver::SyncDriver;

pub use crate::core::Driver;
