//! User feedback port used by the controllers.

use async_trait::async_trait;

/// Confirmation question shown before a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    pub button: String,
}

impl Prompt {
    pub fn new(message: impl Into<String>, button: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            button: button.into(),
        }
    }
}

/// Loading indicator, confirmation and toasts.
///
/// Controllers report every outcome through this port and never render
/// anything themselves.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    fn loading(&self);

    /// Dismiss the loading indicator.
    fn close(&self);

    /// Ask the operator to confirm; `false` aborts the write.
    async fn confirm(&self, prompt: &Prompt) -> bool;

    fn success(&self, message: &str);

    fn info(&self, message: &str);

    fn error(&self, message: &str);
}

/// Wraps a port whose confirmation was already collected by the caller.
///
/// The TUI asks for confirmation in a modal before it runs the controller
/// operation, so the operation's own prompt is answered "yes".
pub struct PreConfirmed<'a, P: NotificationPort + ?Sized>(pub &'a P);

#[async_trait]
impl<'a, P: NotificationPort + ?Sized> NotificationPort for PreConfirmed<'a, P> {
    fn loading(&self) {
        self.0.loading();
    }

    fn close(&self) {
        self.0.close();
    }

    async fn confirm(&self, _prompt: &Prompt) -> bool {
        true
    }

    fn success(&self, message: &str) {
        self.0.success(message);
    }

    fn info(&self, message: &str) {
        self.0.info(message);
    }

    fn error(&self, message: &str) {
        self.0.error(message);
    }
}
