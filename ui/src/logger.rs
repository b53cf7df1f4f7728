use crate::config::LoggingConfig;
use crate::constants::env_vars::LOGGING_LEVEL;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs::OpenOptions;

/// Map a configured level name to a filter, `None` when it is not a level.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// Effective level: the configured one, raised by each `-v` on the command line.
pub fn level_filter(configured: LevelFilter, verbosity: u8) -> LevelFilter {
    let raised = match verbosity {
        0 => return configured,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    configured.max(raised)
}

pub fn setup_logger(config: &LoggingConfig, verbosity: u8) -> Result<(), log::SetLoggerError> {
    let configured = parse_level(config.level());
    let log_level = level_filter(configured.unwrap_or(LevelFilter::Info), verbosity);

    let colors = ColoredLevelConfig::new()
        .trace(Color::BrightBlack)
        .debug(Color::BrightBlue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    // Base configuration for all outputs
    let base_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(log_level);

    // stdout carries command output, so logs go to a file or stderr
    match config.file() {
        Some(file_path) => match OpenOptions::new().create(true).append(true).open(file_path) {
            Ok(file) => base_config.chain(file).apply()?,
            Err(e) => {
                eprintln!("Warning: Failed to open log file '{file_path}': {e}");
                eprintln!("Continuing with logging to stderr.");
                base_config.chain(std::io::stderr()).apply()?;
            }
        },
        None => base_config.chain(std::io::stderr()).apply()?,
    }

    if configured.is_none() {
        log::warn!(
            "Unknown log level '{}' (set via config or {LOGGING_LEVEL}), using info",
            config.level()
        );
    }
    log::debug!("Logger initialized with level: {log_level}");
    Ok(())
}
