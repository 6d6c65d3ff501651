//! Query parameters for list endpoints.

use crate::{ActiveFilter, CatalogItem, ItemId, SortDirection};
use serde::{Deserialize, Serialize};

/// Page size the API treats as "everything".
pub const ALL_ITEMS: u32 = 1_000_000;

pub const DEFAULT_SORT_COLUMN: &str = "descripcion";

/// Column classifications are ranked by.
pub const RATING_COLUMN: &str = "puntuacion";

/// Query string of `GET /{resource}`.
///
/// Field names follow the API's parameters; `activo` is always sent, empty
/// when unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub direccion: SortDirection,
    pub columna: String,
    pub parametro: String,
    pub pagina: u32,
    pub items_por_pagina: u32,
    #[serde(with = "active_filter_param")]
    pub activo: ActiveFilter,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            direccion: SortDirection::Asc,
            columna: DEFAULT_SORT_COLUMN.to_string(),
            parametro: String::new(),
            pagina: 1,
            items_por_pagina: ALL_ITEMS,
            activo: ActiveFilter::All,
        }
    }
}

impl ListQuery {
    /// Every active record ranked by rating, best first.
    pub fn ranked_active() -> Self {
        Self {
            direccion: SortDirection::Desc,
            columna: RATING_COLUMN.to_string(),
            activo: ActiveFilter::Active,
            ..Self::default()
        }
    }

    /// Every active record in alphabetical order.
    pub fn all_active() -> Self {
        Self {
            activo: ActiveFilter::Active,
            ..Self::default()
        }
    }
}

/// Query string of `GET /etiquetas-aparicion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceQuery {
    pub direccion: SortDirection,
    pub columna: String,
    pub categoria_id: ItemId,
}

impl OccurrenceQuery {
    /// All occurrences of one category, newest first.
    pub fn for_category(categoria_id: ItemId) -> Self {
        Self {
            direccion: SortDirection::Desc,
            columna: "createdAt".to_string(),
            categoria_id,
        }
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListPage {
    pub items: Vec<CatalogItem>,
    pub total_items: u64,
}

mod active_filter_param {
    use crate::ActiveFilter;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(filter: &ActiveFilter, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(filter.as_query_value())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ActiveFilter, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "" => Ok(ActiveFilter::All),
            "true" => Ok(ActiveFilter::Active),
            "false" => Ok(ActiveFilter::Inactive),
            other => Err(serde::de::Error::custom(format!(
                "invalid activo filter: {other}"
            ))),
        }
    }
}
