//! Five-star rating display.

use catalogo_core::star_rating;
use ratatui::{style::Style, text::Span};

pub const FILLED_STAR: char = '★';
pub const EMPTY_STAR: char = '☆';

pub struct StarRating {
    pub rating: i64,
    pub style: Style,
}

impl StarRating {
    pub fn text(&self) -> String {
        star_rating(self.rating)
            .iter()
            .map(|filled| if *filled { FILLED_STAR } else { EMPTY_STAR })
            .collect()
    }

    pub fn span(&self) -> Span<'static> {
        Span::styled(self.text(), self.style)
    }
}
