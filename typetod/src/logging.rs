use std::sync::Once;

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "typetod.log";
const LOG_ENV: &str = "TYPETOD_LOG";

static PANIC_HOOK: Once = Once::new();

/// Send logs to `typetod.log` in the cache directory
///
/// The terminal belongs to the game, so nothing is ever written to it. Returns `None` when
/// there is no cache directory or a subscriber is already installed. Keep the guard alive
/// until exit, or buffered lines are lost.
pub fn init() -> Option<WorkerGuard> {
    let dirs = ProjectDirs::from("com", "typetod", "typetod")?;
    let log_dir = dirs.cache_dir();
    std::fs::create_dir_all(log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    tracing::debug!(dir = %log_dir.display(), "Logging initialized");
    Some(guard)
}

/// Log panics before the default hook prints them
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_hook(info);
        }));
    });
}
