//! Logger setup. Library crates only log through the `log` facade.

use std::io::Write;

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

/// Install the global logger.
///
/// Normal runs print bare info messages, `--quiet` keeps warnings and
/// errors only, and `--verbose` adds debug messages with timestamps.
/// `RUST_LOG`, when set, is applied on top.
pub(crate) fn init(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("rustls", LevelFilter::Warn);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    builder.format(move |buf, record| {
        let tag = match record.level() {
            Level::Error => Some("error".if_supports_color(Stderr, |t| t.red()).to_string()),
            Level::Warn => Some("warn".if_supports_color(Stderr, |t| t.yellow()).to_string()),
            _ if verbose => Some(record.level().as_str().to_lowercase()),
            _ => None,
        };

        if verbose {
            write!(buf, "{} ", chrono::Local::now().format("%H:%M:%S%.3f"))?;
        }
        match tag {
            Some(tag) => writeln!(buf, "{}: {}", tag, record.args()),
            None => writeln!(buf, "{}", record.args()),
        }
    });

    if let Err(e) = builder.try_init() {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
