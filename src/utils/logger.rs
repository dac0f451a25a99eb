//! Logging infrastructure
//!
//! Structured logging setup for both development and production. Audit
//! lines (target = "audit") go through the same subscriber, so the
//! rolling file under `work_dir/logs` doubles as the audit trail.

use std::path::Path;

/// Initialize the logger with console output only
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional daily-rolling file output
///
/// `log_level` defaults to `info`; `RUST_LOG` is not consulted, the
/// level is an explicit argument so tests and the binary stay in sync.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "orderd");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
