use std::io::Write;

use anyhow::{anyhow, Result};
use log::LevelFilter;

/// Parses a level name, accepting the usual syslog-ish aliases.
pub fn parse_level(name: &str) -> Result<LevelFilter> {
    let level = match name.trim().to_ascii_uppercase().as_str() {
        "CRITICAL" | "FATAL" | "ERROR" => LevelFilter::Error,
        "WARNING" | "WARN" => LevelFilter::Warn,
        "INFO" => LevelFilter::Info,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" | "NOTSET" => LevelFilter::Trace,
        "OFF" => LevelFilter::Off,
        _ => return Err(anyhow!("Unknown log level {name:?}")),
    };
    Ok(level)
}

/// Installs the process logger, writing to stderr.
///
/// Must be called once, before any scraping starts.
pub fn init(level: LevelFilter) -> Result<()> {
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;
    Ok(())
}
