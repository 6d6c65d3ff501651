//! Catalog entity types as served by the REST API

use crate::{ItemId, SortDirection, Timestamp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

fn active_by_default() -> bool {
    true
}

/// A named reference entity: category, classification, tag or unit of measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(alias = "_id")]
    pub id: ItemId,
    pub descripcion: String,
    #[serde(default = "active_by_default")]
    pub activo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Rating in 0..=5; only classifications carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puntuacion: Option<i64>,
}

impl CatalogItem {
    pub fn new(id: impl Into<ItemId>, descripcion: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            descripcion: descripcion.into(),
            activo: true,
            created_at: None,
            puntuacion: None,
        }
    }

    pub fn with_activo(mut self, activo: bool) -> Self {
        self.activo = activo;
        self
    }

    pub fn with_puntuacion(mut self, puntuacion: i64) -> Self {
        self.puntuacion = Some(puntuacion);
        self
    }

    /// Rating used for ranking; records without one rank lowest.
    pub fn rating(&self) -> i64 {
        self.puntuacion.unwrap_or(0)
    }
}

/// Reference to another record: populated by the server, populated with
/// only some fields, or a bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    Item(CatalogItem),
    Partial(PartialItem),
    Id(ItemId),
}

/// Populated reference missing fields a full [`CatalogItem`] requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialItem {
    #[serde(alias = "_id")]
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

impl ItemRef {
    pub fn id(&self) -> &ItemId {
        match self {
            ItemRef::Item(item) => &item.id,
            ItemRef::Partial(partial) => &partial.id,
            ItemRef::Id(id) => id,
        }
    }

    /// The full record, when the server sent one.
    pub fn item(&self) -> Option<&CatalogItem> {
        match self {
            ItemRef::Item(item) => Some(item),
            ItemRef::Partial(_) | ItemRef::Id(_) => None,
        }
    }
}

/// "This tag was observed for this category under this classification."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagOccurrence {
    #[serde(alias = "_id")]
    pub id: ItemId,
    pub etiqueta: ItemRef,
    pub categoria_id: ItemRef,
    pub clasificacion_id: ItemRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl TagOccurrence {
    pub fn tag_id(&self) -> &ItemId {
        self.etiqueta.id()
    }

    pub fn category_id(&self) -> &ItemId {
        self.categoria_id.id()
    }

    pub fn classification_id(&self) -> &ItemId {
        self.clasificacion_id.id()
    }
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub descripcion: String,
    pub creator_user_id: String,
}

/// Partial update; absent fields are left untouched by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

impl UpdateItemRequest {
    pub fn descripcion(descripcion: impl Into<String>) -> Self {
        Self {
            descripcion: Some(descripcion.into()),
            activo: None,
        }
    }

    pub fn activo(activo: bool) -> Self {
        Self {
            descripcion: None,
            activo: Some(activo),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOccurrenceRequest {
    pub etiqueta_id: ItemId,
    pub categoria_id: ItemId,
    pub clasificacion_id: ItemId,
    pub creator_user_id: String,
}

// ============================================================================
// LOCAL ORDERING
// ============================================================================

/// Case-insensitive comparison of two descriptions in the given direction.
pub fn compare_descripcion(a: &str, b: &str, direction: SortDirection) -> Ordering {
    let ordering = a.to_lowercase().cmp(&b.to_lowercase());
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Re-sort a page in place without a round trip. Ties keep arrival order.
pub fn sort_by_descripcion(items: &mut [CatalogItem], direction: SortDirection) {
    items.sort_by(|a, b| compare_descripcion(&a.descripcion, &b.descripcion, direction));
}
