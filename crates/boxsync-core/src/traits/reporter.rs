//! Error reporting hook for failures nobody awaits.

use crate::error::AppError;

/// Receives errors from background work (polling reloads, sweeps) and
/// errors that explicit actions want surfaced beyond their return value.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug + 'static {
    /// Handle an error. Must not panic.
    fn report(&self, context: &str, error: &AppError);
}

/// Default reporter: writes the error to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, error: &AppError) {
        tracing::warn!(
            context,
            kind = %error.kind,
            user_message = error.user_message.as_deref().unwrap_or(""),
            "{}",
            error.message
        );
    }
}
