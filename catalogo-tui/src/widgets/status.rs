//! Status indicator widget.

use crate::list::ListState;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct StatusIndicator {
    pub title: String,
    pub status: String,
    pub style: Style,
}

impl StatusIndicator {
    /// Page position and record count of a list screen.
    pub fn pager(state: &ListState, loading: bool, style: Style) -> Self {
        let mut status = format!(
            "Page {}/{} | {} records | sorted {} {}",
            state.current_page,
            state.page_count(),
            state.total_count,
            state.sort_column,
            state.sort_direction,
        );
        if loading {
            status.push_str(" | loading...");
        }
        Self {
            title: "Pages".to_string(),
            status,
            style,
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.status.clone()).style(self.style).block(
            Block::default()
                .title(self.title.as_str())
                .borders(Borders::ALL),
        );
        f.render_widget(paragraph, area);
    }
}
