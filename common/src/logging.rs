// Common Crate - logging.rs
// common/src/logging.rs
use tracing::{Dispatch, Level};
use tracing_subscriber::FmtSubscriber;

/// Setup tracing for the server binary
pub fn setup_tracing(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Logging capability handed to each auth component.
///
/// Components never emit through the process-wide dispatcher on their own;
/// they run their instrumentation inside the dispatcher they were built
/// with. The default discards everything.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Default for Logger {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Logger {
    /// No-op logger
    pub fn none() -> Self {
        Self { dispatch: Dispatch::none() }
    }

    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Capture whichever subscriber is active for the calling thread
    pub fn current() -> Self {
        Self {
            dispatch: tracing::dispatcher::get_default(|d| d.clone()),
        }
    }

    /// Run `f` with this logger's dispatcher as the default
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
