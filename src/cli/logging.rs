//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level. With `[logging] file` set,
//! output is appended to that file without ANSI colors; otherwise it goes
//! to stderr so stdout stays clean for command output.

use super::config::LoggingConfig;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| format!("Invalid log level '{}': {}", config.level, e))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| format!("Failed to initialize logging: {}", e).into())
}
