//! # heapdb
//!
//! Entry point for the **heapdb** storage engine: a buffer pool over a paged
//! disk file, and heap files layered on top of the pool.
//!
//! The binary loads `heapdb.toml`, wires the engine environment, and runs a
//! short smoke flow through every layer: it opens (or creates) a heap file,
//! inserts a few records, reads them back through a scan, and flushes the
//! pool.

use crate::config::EngineConfig;
use crate::engine_environment::EngineEnvironment;
use heap::heap_file::HeapFile;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

mod config;
mod engine_environment;

fn main() {
    let cfg = match EngineConfig::load_from_file("heapdb.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let logging_guard = match init_logging(&cfg.storage.logs_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            std::process::exit(2);
        }
    };

    let env = match EngineEnvironment::new(cfg) {
        Ok(env) => Arc::new(env),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = smoke_flow(&env) {
        tracing::error!(error = %e, "smoke flow failed");
        std::process::exit(1);
    }

    drop(logging_guard);
}

/// Pushes a handful of records through the whole stack and reports what it
/// finds.
fn smoke_flow(env: &EngineEnvironment) -> Result<(), Box<dyn Error>> {
    let file = HeapFile::new(env.buffer.clone(), env.disk.clone(), Some("smoke.rel"))?;
    tracing::info!(head = %file.head(), "opened heap file \"smoke.rel\"");

    let before = file.record_count()?;
    tracing::info!(records = before, "records already present");

    for value in 0..3u8 {
        let record = vec![value; 64];
        let rid = file.insert(&record)?;
        let readback = file.select(rid)?;
        assert_eq!(readback, record);
        tracing::info!(%rid, len = record.len(), "inserted record");
    }

    let mut scanned = 0usize;
    for item in file.scan() {
        let (rid, bytes) = item?;
        tracing::debug!(%rid, len = bytes.len(), "scanned record");
        scanned += 1;
    }
    tracing::info!(
        scanned,
        total = file.record_count()?,
        resident = env.buffer.resident_page_count(),
        "scan complete"
    );

    env.buffer.flush_all_pages()?;
    tracing::info!("flushed all pages");
    Ok(())
}

/// Sets up the logging for the engine
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard, Box<dyn Error + Send + Sync>> {
    let file_appender = tracing_appender::rolling::daily(log_dir, "heapdb.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_level(true)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
