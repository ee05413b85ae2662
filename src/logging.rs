//! Structured logging via `tracing`.
//!
//! The terminal front end owns stdout/stderr while running, so the
//! subscriber writes to a log file instead. `RUST_LOG` overrides the
//! configured filter. Initialization is idempotent: the first call wins.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber writing to `file` (appending).
pub fn init(filter: &str, file: &Path) -> std::io::Result<()> {
    if TRACING_INIT.is_completed() {
        return Ok(());
    }
    let out = OpenOptions::new().create(true).append(true).open(file)?;

    let filter_str = filter.to_string();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&filter_str))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(out))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact();

        // A subscriber may already be installed (e.g. by a test harness)
        let _ = subscriber.try_init();
    });
    Ok(())
}
