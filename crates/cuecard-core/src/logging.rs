#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! Call sites use `tracing` directly behind `#[cfg(feature = "tracing")]`.
//! With the `log-file` feature, [`init_file_logging`] installs a
//! `tracing-subscriber` that writes to a file. Stdout is owned by the frame
//! renderer, so logs never go to the terminal.

/// Environment variable holding the log filter directive (e.g. `debug`,
/// `cuecard_runtime=trace`).
pub const LOG_FILTER_ENV: &str = "CUECARD_LOG";

/// Filter used when [`LOG_FILTER_ENV`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global subscriber writing to `path` (appending).
///
/// The filter is read from [`LOG_FILTER_ENV`]. With the `tracing-json`
/// feature each event is one JSON object per line.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a global subscriber is
/// already installed.
#[cfg(feature = "log-file")]
pub fn init_file_logging(path: &std::path::Path) -> std::io::Result<()> {
    use std::sync::Mutex;
    use tracing_subscriber::EnvFilter;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    #[cfg(feature = "tracing-json")]
    let result = builder.json().try_init();
    #[cfg(not(feature = "tracing-json"))]
    let result = builder.try_init();

    result.map_err(std::io::Error::other)
}

#[cfg(all(test, feature = "log-file"))]
mod tests {
    use super::*;

    #[test]
    fn file_logging_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cuecard.log");
        // A second install in the same process fails, which is fine here.
        let _ = init_file_logging(&path);
        assert!(path.exists());
    }
}
