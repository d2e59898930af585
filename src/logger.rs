use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Route `tracing` output to an append-only log file, once per process;
/// later calls are no-ops. A `RUST_LOG` value in the environment overrides
/// the `filter` argument.
pub fn init_logging<P: AsRef<Path>>(path: P, filter: &str) {
    if LOG_GUARD.get().is_some() {
        return;
    }

    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    else {
        return;
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    if LOG_GUARD.set(guard).is_err() {
        // Lost an init race; the winner's guard keeps its writer alive.
        return;
    }

    let env_filter = match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .finish();

    // Another subscriber may already be installed by a racing test.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
