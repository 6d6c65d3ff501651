//! Generic catalog list screen.

use crate::state::{App, InputMode};
use crate::theme::{active_color, rating_band_color};
use crate::widgets::{DetailPanel, FilterBar, FilterOption, StarRating, StatusIndicator};
use catalogo_core::RatingBand;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(view) = app.active_list() else {
        return;
    };
    let controller = &view.controller;
    let state = controller.state();
    let labels = controller.resource().labels();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    match &app.input {
        InputMode::Search(text) => {
            let search = Paragraph::new(format!("{}_", text))
                .style(Style::default().fg(app.theme.text))
                .block(
                    Block::default()
                        .title("Search (Enter to close)")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(app.theme.border_focus)),
                );
            f.render_widget(search, rows[0]);
        }
        _ => {
            let options = FilterOption::active_flag_options(state.active_filter);
            FilterBar {
                title: "Filter [f] • Search [/]",
                filters: &options,
                search: &state.search_text,
                active_style: Style::default().fg(app.theme.primary),
                inactive_style: Style::default().fg(app.theme.text_dim),
            }
            .render(f, rows[0]);
        }
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let items: Vec<ListItem> = state
        .items
        .iter()
        .map(|item| {
            let mut spans = vec![Span::styled(
                item.descripcion.clone(),
                Style::default().fg(active_color(item.activo, &app.theme)),
            )];
            if let Some(rating) = item.puntuacion {
                let color = rating_band_color(RatingBand::from_rating(rating), &app.theme);
                spans.push(Span::raw("  "));
                spans.push(StarRating { rating, style: Style::default().fg(color) }.span());
            }
            if !item.activo {
                spans.push(Span::styled("  (inactive)", Style::default().fg(app.theme.text_muted)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut list_state = ListState::default();
    if !state.items.is_empty() {
        list_state.select(Some(view.selected));
    }
    let list = List::new(items)
        .block(Block::default().title(labels.plural).borders(Borders::ALL))
        .highlight_style(Style::default().bg(app.theme.bg_highlight).fg(app.theme.primary));
    f.render_stateful_widget(list, columns[0], &mut list_state);

    match view.selected_item() {
        Some(item) => {
            DetailPanel::for_item("Details", item, Style::default().fg(app.theme.secondary))
                .render(f, columns[1]);
        }
        None => {
            let empty = Paragraph::new(format!("No {} found", labels.plural.to_lowercase()))
                .style(Style::default().fg(app.theme.text_dim))
                .block(Block::default().title("Details").borders(Borders::ALL));
            f.render_widget(empty, columns[1]);
        }
    }

    StatusIndicator::pager(state, controller.is_loading(), Style::default().fg(app.theme.text_dim))
        .render(f, rows[2]);
}
