//! catalogo core - entity types
//!
//! Pure data structures shared by the client crates: catalog records, the
//! tag-occurrence relation, list query parameters, per-resource settings and
//! the rating projections. Nothing in here performs I/O.

mod entities;
mod enums;
mod error;
mod identity;
mod query;
mod rating;
mod resource;

pub use entities::{
    compare_descripcion, sort_by_descripcion, CatalogItem, CreateItemRequest,
    CreateOccurrenceRequest, ItemRef, PartialItem, TagOccurrence, UpdateItemRequest,
};
pub use enums::{AbmMode, ActiveFilter, SortDirection};
pub use error::{validate_descripcion, ValidationError};
pub use identity::{ItemId, Timestamp};
pub use query::{ListPage, ListQuery, OccurrenceQuery, ALL_ITEMS, DEFAULT_SORT_COLUMN, RATING_COLUMN};
pub use rating::{star_rating, RatingBand, MAX_STARS};
pub use resource::{Resource, ResourceLabels};
