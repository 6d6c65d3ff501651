//! Event types for the TUI event loop.

use crate::api_client::ApiClientError;
use catalogo_core::{ListPage, Resource};
use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// A debounced search window elapsed for the given list screen.
    SearchSettled { resource: Resource, generation: u64 },
    /// A spawned list fetch finished; `seq` identifies the request.
    ListLoaded {
        resource: Resource,
        seq: u64,
        result: Result<ListPage, ApiClientError>,
    },
}
