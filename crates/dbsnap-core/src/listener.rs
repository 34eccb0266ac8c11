//! Progress notification.

use tracing::info;

/// Receives a status line before each read phase of a snapshot build.
///
/// Listeners are notified synchronously, in registration order.
pub trait StatusListener {
    /// Called with a one-line, human-readable status message.
    fn on_status(&self, message: &str);
}

impl<F> StatusListener for F
where
    F: Fn(&str),
{
    fn on_status(&self, message: &str) {
        self(message);
    }
}

/// Forwards status messages to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl StatusListener for TracingListener {
    fn on_status(&self, message: &str) {
        info!(target: "dbsnap::progress", "{message}");
    }
}

/// Sends `message` to every listener.
pub(crate) fn notify(listeners: &[&dyn StatusListener], message: &str) {
    for listener in listeners {
        listener.on_status(message);
    }
}
