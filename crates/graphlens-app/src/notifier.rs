//! User-visible alerts

/// Modal-alert equivalent. The controller is the only caller.
pub trait Notifier: Send {
    fn alert(&self, message: &str);
}

/// Sends alerts to the log. Front-ends without a UI surface use this.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
