//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod stars;
pub mod status;

pub use detail::DetailPanel;
pub use filter::{FilterBar, FilterOption};
pub use stars::StarRating;
pub use status::StatusIndicator;
