//! Diagnostic logging.
//!
//! The interactive chat owns the terminal, so its logs only go to a file when
//! one is given. One-shot commands log warnings to stderr.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    File(&'a Path),
    Stderr,
    Off,
}

impl LogTarget<'_> {
    /// Filter used when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        match self {
            LogTarget::File(_) => "syllabot=info",
            LogTarget::Stderr => "syllabot=warn",
            LogTarget::Off => "off",
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Call once per process.
pub fn init(target: LogTarget<'_>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(target.default_filter()));

    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)
                .map_err(|err| format!("Failed to open log file {}: {}", path.display(), err))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()?;
        }
    }
    Ok(())
}
