//! Rating projections for classification cards.

use serde::{Deserialize, Serialize};

pub const MAX_STARS: usize = 5;

/// Five-slot star projection: slot `i` is filled iff `i < rating`.
///
/// Out-of-range ratings are not clamped; anything above five fills every
/// slot and anything below one fills none.
pub fn star_rating(rating: i64) -> [bool; MAX_STARS] {
    let mut stars = [false; MAX_STARS];
    for (i, star) in stars.iter_mut().enumerate() {
        *star = (i as i64) < rating;
    }
    stars
}

/// Severity band of a rating, used to pick a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingBand {
    High,
    Medium,
    Low,
    Critical,
}

impl RatingBand {
    pub fn from_rating(rating: i64) -> Self {
        if rating >= 4 {
            RatingBand::High
        } else if rating >= 3 {
            RatingBand::Medium
        } else if rating >= 2 {
            RatingBand::Low
        } else {
            RatingBand::Critical
        }
    }
}
