//! Tracing subscriber setup.
//!
//! Log output goes to a file, never the terminal: the alternate screen owns
//! stdout while the editor runs.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber with file logging and
/// environment-based filtering (RUST_LOG, INFO default).
///
/// Returns false if the log file could not be created or a subscriber was
/// already installed; the editor runs without logging in that case.
pub fn init_global(log_file_path: &Path) -> bool {
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };
    build_subscriber(log_file).try_init().is_ok()
}

/// Build the subscriber used in production. Shared with tests that want to
/// capture log output in a file.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
}

/// Default log file location, under the system temp directory.
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(format!("jot-{}.log", std::process::id()))
}
