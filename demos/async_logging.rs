//! Async logging example
//!
//! Demonstrates the async driver with several producer threads and a
//! counting hook.
//!
//! Run with: cargo run --example async_logging

use rust_field_logger::prelude::*;
use rust_field_logger::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn main() -> Result<()> {
    println!("=== Rust Field Logger - Async Logging Example ===\n");

    let system = LogSystem::new();
    system.set_driver(
        AsyncDriver::builder()
            .capacity(4096)
            .overflow_policy(OverflowPolicy::AlertAndDrop)
            .on_overflow(Arc::new(|count| eprintln!("ALERT: {} logs dropped", count)))
            .build()?,
    );

    let delivered = Arc::new(AtomicUsize::new(0));
    let delivered_clone = Arc::clone(&delivered);
    system.register_hook(move |_| {
        delivered_clone.fetch_add(1, Ordering::Relaxed);
    });

    println!("1. Multi-threaded logging:");
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = system.logger("worker");
            thread::spawn(move || {
                for seq in 0..20 {
                    info!(logger, "threadId={}, seq={}", thread_id, seq);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer thread panicked");
    }

    system.flush(DEFAULT_FLUSH_TIMEOUT);
    println!(
        "\n   5 threads logged 20 messages each; hooks saw {}",
        delivered.load(Ordering::Relaxed)
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
