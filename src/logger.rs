//! Logging setup for framedb tools

use chrono::Local;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging from the `FRAMEDB_LOG_LEVEL` environment variable
pub fn init() {
    let level = env::var("FRAMEDB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_with_level(&level);
}

/// Initialize logging at an explicit level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with_level(level_str: &str) {
    let filter = match level_str {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    };

    let _ = env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            write!(
                buf,
                "[{} {} {}] ",
                Local::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.target()
            )?;
            writeln!(buf, "{}", record.args())
        })
        .try_init();
}
