//! Shooter Bar management core.
//!
//! Backend state and operations for a small bar: the 15-table dine-in
//! floor, the pool table rental tracker, staff accounts and sessions, the
//! activity log, dashboard analytics, backups, and the incoming order
//! queue. Everything durable lives as JSON slots in a single SQLite
//! database opened through [`db::init`].

use std::path::Path;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod activity;
pub mod analytics;
pub mod backup;
pub mod db;
pub mod error;
pub mod menu;
pub mod order_queue;
pub mod pool;
pub mod session;
pub mod staff;
pub mod store;
pub mod tables;

/// Initialize structured logging (console + daily rolling file). The
/// returned guard flushes the file writer on drop; keep it alive for the
/// life of the process.
pub fn init_logging(log_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shooter_bar_lib=debug"));

    std::fs::create_dir_all(log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(log_dir, "bar");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let console_layer = fmt::layer().with_target(true);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Shooter Bar core v{}", env!("CARGO_PKG_VERSION"));
    guard
}
