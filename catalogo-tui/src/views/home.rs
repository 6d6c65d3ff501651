//! Landing menu of the catalog screens.

use crate::state::App;
use catalogo_core::Resource;
use ratatui::{
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: ratatui::layout::Rect) {
    let items: Vec<ListItem> = Resource::ALL
        .iter()
        .enumerate()
        .map(|(i, resource)| ListItem::new(format!("{}  {}", i + 2, resource.labels().plural)))
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.home_selected));

    let list = List::new(items)
        .block(Block::default().title("Catalogs").borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}
