//! View rendering dispatch.

pub mod catalog;
pub mod detail;
pub mod home;

use crate::keys::HELP_TEXT;
use crate::nav::View;
use crate::notifications::NotificationLevel;
use crate::state::{App, InputMode};
use crate::theme::notification_color;
use catalogo_core::AbmMode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Home => home::render(f, app, layout[1]),
        View::CategoryDetail => detail::render(f, app, layout[1]),
        View::Categorias | View::Clasificaciones | View::Etiquetas | View::UnidadesMedida => {
            catalog::render(f, app, layout[1])
        }
    }

    render_footer(f, app, layout[2]);
    render_overlays(f, app);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tabs: Vec<Span> = View::all()
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let style = if view.index() == app.active_view.index() {
                Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text_dim)
            };
            Span::styled(format!(" {} {} ", i + 1, view.title()), style)
        })
        .collect();
    let title = format!("CATALOGO | {}", app.config.session.user_id);
    let header = Paragraph::new(Line::from(tabs)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, Style::default().fg(app.theme.primary))),
    );
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if app.notifier.is_loading() {
        ("Loading...".to_string(), Style::default().fg(app.theme.info))
    } else if let Some(note) = app.notifier.latest() {
        let label = match note.level {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "OK",
        };
        (
            format!("{}: {}", label, note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        )
    } else {
        ("? help • q quit".to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_overlays(f: &mut Frame<'_>, app: &App) {
    if app.help_visible {
        render_modal(f, app, "Keybindings", vec![Line::from(HELP_TEXT)]);
        return;
    }
    match &app.input {
        InputMode::Form => {
            let Some(list) = app.active_list() else {
                return;
            };
            let Some(form) = list.controller.form() else {
                return;
            };
            let labels = list.controller.resource().labels();
            let title = match form.mode {
                AbmMode::Crear => format!("New {}", labels.singular),
                AbmMode::Editar => format!("Edit {}", labels.singular),
            };
            let lines = vec![
                Line::from(vec![
                    Span::styled(format!("{}: ", labels.descripcion), Style::default().fg(app.theme.secondary)),
                    Span::raw(format!("{}_", form.descripcion)),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter save • Esc cancel",
                    Style::default().fg(app.theme.text_dim),
                )),
            ];
            render_modal(f, app, &title, lines);
        }
        InputMode::Confirm(modal) => {
            let lines = vec![
                Line::from(modal.prompt.message.clone()),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Enter {} • Esc cancel", modal.prompt.button),
                    Style::default().fg(app.theme.text_dim),
                )),
            ];
            render_modal(f, app, "Confirm", lines);
        }
        InputMode::Normal | InputMode::Search(_) => {}
    }
}

/// Bordered box centered over the current frame.
pub fn render_modal(f: &mut Frame<'_>, app: &App, title: &str, lines: Vec<Line<'_>>) {
    let area = centered_rect(60, 30, f.size());
    f.render_widget(Clear, area);
    let modal = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        );
    f.render_widget(modal, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
