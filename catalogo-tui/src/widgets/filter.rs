//! Filter bar widget.

use catalogo_core::ActiveFilter;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    pub label: String,
    pub active: bool,
}

impl FilterOption {
    /// One option per active-flag filter, in the order `f` cycles them.
    pub fn active_flag_options(current: ActiveFilter) -> Vec<FilterOption> {
        [ActiveFilter::Active, ActiveFilter::Inactive, ActiveFilter::All]
            .into_iter()
            .map(|filter| FilterOption {
                label: filter.label().to_string(),
                active: filter == current,
            })
            .collect()
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub filters: &'a [FilterOption],
    /// Committed search text, shown after the options.
    pub search: &'a str,
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans: Vec<Span> = self
            .filters
            .iter()
            .map(|filter| {
                let style = if filter.active {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" {} ", filter.label), style)
            })
            .collect();
        if !self.search.is_empty() {
            spans.push(Span::styled(format!(" search: {}", self.search), self.inactive_style));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
