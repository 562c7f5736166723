//! Opt-in file logging for stores and test stores.
//!
//! The library only emits `tracing` events. Hosts that want them on disk
//! without wiring their own subscriber call [`init_tracing`].

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV_VAR: &str = "FLOWSTATE_LOG";

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "flowstate=info";

/// Where [`init_tracing`] would write, if `FLOWSTATE_LOG` is set.
///
/// The configured path gets a `.{timestamp}.{pid}` suffix so parallel test
/// binaries each get their own file.
pub fn log_file_path() -> Option<PathBuf> {
    let base = std::env::var_os(LOG_ENV_VAR).filter(|value| !value.is_empty())?;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let mut path = base;
    path.push(format!(".{}.{}", timestamp, std::process::id()));
    Some(PathBuf::from(path))
}

/// Install a global subscriber writing to the file named by `FLOWSTATE_LOG`.
///
/// Returns whether a subscriber was installed. Nothing happens when the
/// variable is unset, when the file cannot be created, or when another
/// subscriber is already in place.
///
/// ```
/// std::env::remove_var(flowstate::logging::LOG_ENV_VAR);
/// assert!(!flowstate::logging::init_tracing());
/// ```
pub fn init_tracing() -> bool {
    let Some(path) = log_file_path() else {
        return false;
    };
    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("flowstate: cannot create log file {}: {}", path.display(), error);
            return false;
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}
