//! Detail panel widget for showing field/value pairs.

use catalogo_core::CatalogItem;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    pub style: Style,
}

impl<'a> DetailPanel<'a> {
    /// Fields shown for any catalog record.
    pub fn for_item(title: &'a str, item: &CatalogItem, style: Style) -> Self {
        let mut fields = vec![
            ("ID", item.id.to_string()),
            ("Description", item.descripcion.clone()),
            ("Status", if item.activo { "Active" } else { "Inactive" }.to_string()),
        ];
        if let Some(created_at) = item.created_at {
            fields.push(("Created", created_at.format("%Y-%m-%d %H:%M").to_string()));
        }
        if let Some(puntuacion) = item.puntuacion {
            fields.push(("Rating", puntuacion.to_string()));
        }
        Self { title, fields, style }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), self.style),
                    Span::raw(value.clone()),
                ])
            })
            .collect();

        let widget = Paragraph::new(Text::from(lines))
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
