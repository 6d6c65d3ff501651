//! Trailing-edge debounce for search input.
//!
//! Every keystroke bumps a generation counter and schedules a settle event
//! after the window elapses. When a settle event arrives, only the one that
//! still carries the latest generation commits its text; earlier ones were
//! superseded by later keystrokes inside the window.

use crate::events::TuiEvent;
use catalogo_core::Resource;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    pub generation: u64,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: u64,
    pending: Option<String>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            pending: None,
        }
    }

    /// Record a keystroke; the returned ticket must be settled after `delay`.
    pub fn push(&mut self, text: impl Into<String>) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(text.into());
        DebounceTicket {
            generation: self.generation,
            delay: self.window,
        }
    }

    /// Take the pending text if `generation` is still the latest keystroke.
    pub fn settle(&mut self, generation: u64) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

/// Deliver a [`TuiEvent::SearchSettled`] once the ticket's delay has passed.
pub fn spawn_settle_timer(sender: mpsc::Sender<TuiEvent>, resource: Resource, ticket: DebounceTicket) {
    tokio::spawn(async move {
        tokio::time::sleep(ticket.delay).await;
        let _ = sender
            .send(TuiEvent::SearchSettled {
                resource,
                generation: ticket.generation,
            })
            .await;
    });
}
