//! Notification system for the TUI.

use crate::ports::{NotificationPort, Prompt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Notifications kept for the footer; older ones are dropped.
const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
    Success,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Status-line implementation of [`NotificationPort`].
///
/// Confirmation prompts cannot block the event loop, so the TUI collects
/// them through modals and wraps this notifier in
/// [`PreConfirmed`](crate::ports::PreConfirmed). A bare `Notifier` declines
/// every prompt.
#[derive(Debug, Default)]
pub struct Notifier {
    entries: Mutex<Vec<Notification>>,
    loading: AtomicBool,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message);
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(notification);
            if entries.len() > MAX_NOTIFICATIONS {
                let overflow = entries.len() - MAX_NOTIFICATIONS;
                entries.drain(..overflow);
            }
        }
    }

    pub fn latest(&self) -> Option<Notification> {
        self.entries.lock().ok().and_then(|entries| entries.last().cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NotificationPort for Notifier {
    fn loading(&self) {
        self.loading.store(true, Ordering::Relaxed);
    }

    fn close(&self) {
        self.loading.store(false, Ordering::Relaxed);
    }

    async fn confirm(&self, prompt: &Prompt) -> bool {
        tracing::debug!(prompt = %prompt.message, "Prompt declined without a modal");
        false
    }

    fn success(&self, message: &str) {
        self.close();
        self.push(NotificationLevel::Success, message);
    }

    fn info(&self, message: &str) {
        self.close();
        self.push(NotificationLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.close();
        tracing::warn!(error = %message, "Operation failed");
        self.push(NotificationLevel::Error, message);
    }
}
