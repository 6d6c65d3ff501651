//! Category detail: ranked classifications with their tags.

use crate::detail::RelationDialog;
use crate::state::App;
use crate::theme::rating_band_color;
use crate::views::centered_rect;
use crate::widgets::{DetailPanel, StarRating};
use catalogo_core::RatingBand;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let controller = &app.detail.controller;
    let Some(category) = controller.category() else {
        let empty = Paragraph::new("No category loaded")
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().title("Category").borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    DetailPanel::for_item("Category", category, Style::default().fg(app.theme.secondary))
        .render(f, columns[0]);

    // Each classification row is followed by the tags recorded under it.
    let mut items = Vec::new();
    let mut selected_row = None;
    for (index, classification) in controller.classifications().iter().enumerate() {
        let rating = classification.rating();
        let color = rating_band_color(RatingBand::from_rating(rating), &app.theme);
        if index == app.detail.selected {
            selected_row = Some(items.len());
        }
        items.push(ListItem::new(Line::from(vec![
            Span::styled(
                classification.descripcion.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            StarRating { rating, style: Style::default().fg(color) }.span(),
        ])));
        let tags: Vec<String> = controller
            .occurrences_for(&classification.id)
            .iter()
            .map(|tag| tag.descripcion.clone())
            .collect();
        let line = if tags.is_empty() {
            Span::styled("    no tags", Style::default().fg(app.theme.text_muted))
        } else {
            Span::styled(format!("    {}", tags.join(", ")), Style::default().fg(app.theme.text))
        };
        items.push(ListItem::new(Line::from(line)));
    }

    let mut state = ListState::default();
    state.select(selected_row);
    let list = List::new(items)
        .block(
            Block::default()
                .title("Classifications • Enter add tag • a pick classification • Esc back")
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().bg(app.theme.bg_highlight));
    f.render_stateful_widget(list, columns[1], &mut state);

    render_relation_dialog(f, app);
}

fn render_relation_dialog(f: &mut Frame<'_>, app: &App) {
    let controller = &app.detail.controller;
    let (title, labels): (String, Vec<String>) = match controller.dialog() {
        RelationDialog::Closed => return,
        RelationDialog::SelectingClassification => (
            "Select a classification".to_string(),
            controller
                .classifications()
                .iter()
                .map(|c| c.descripcion.clone())
                .collect(),
        ),
        RelationDialog::SelectingTag { classification, filter } => (
            format!("Add tag under {} • filter: {}_", classification.descripcion, filter),
            controller
                .tag_choices()
                .iter()
                .map(|t| t.descripcion.clone())
                .collect(),
        ),
    };

    let area = centered_rect(50, 50, f.size());
    f.render_widget(Clear, area);
    let items: Vec<ListItem> = labels.into_iter().map(ListItem::new).collect();
    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.detail.picker_selected));
    }
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .highlight_style(Style::default().fg(app.theme.primary))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}
