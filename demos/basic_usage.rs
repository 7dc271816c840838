//! Basic usage example
//!
//! Demonstrates the process-wide API: levels, per-name overrides, context
//! fields, bound fields, and hooks.
//!
//! Run with: cargo run --example basic_usage

use rust_field_logger::prelude::*;
use rust_field_logger::{fields, info, warn};

fn main() {
    println!("=== Rust Field Logger - Basic Usage Example ===\n");

    println!("1. Logging at different levels through the root logger:");
    rust_field_logger::trace("This is a trace message");
    rust_field_logger::debug("This is a debug message");
    info!("i'm {:010}", 18);
    warn!("retry {} of {}", 3, 5);
    rust_field_logger::error("This is an error message");

    println!("\n2. Global level WARN with a DEBUG override for 'db':");
    rust_field_logger::set_level(Level::Warn);
    rust_field_logger::set_logger_level("db", Level::Debug);
    let db = rust_field_logger::new_logger("db");
    let http = rust_field_logger::new_logger("http");
    db.debug("db debug (visible)");
    http.info("http info (hidden)");
    http.warn("http warn (visible)");

    println!("\n3. Context and bound fields:");
    rust_field_logger::set_context_field("uid", 1001u64);
    rust_field_logger::set_context_fields(&fields! { "admin" => true, "username" => "jackson" });
    let tenant = db.bind_fields(fields! { "tid" => "acme" });
    tenant.info("with uid, admin, username, tid");
    rust_field_logger::del_context_field("uid");
    tenant.info("uid removed");

    println!("\n4. Hooks:");
    rust_field_logger::register_hook(|record| {
        if record.level >= Level::Error {
            println!("   hook saw {} from '{}'", record.level, record.logger);
        }
    });
    db.error("connection lost");

    println!("\n=== Example completed successfully! ===");
}
