//! Enum types shared by list screens

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a list ordering, as understood by the `direccion` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tri-state filter on the `activo` flag.
///
/// `All` is sent as an empty string, which the API reads as "no filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl ActiveFilter {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ActiveFilter::All => "",
            ActiveFilter::Active => "true",
            ActiveFilter::Inactive => "false",
        }
    }

    /// Whether an item with the given `activo` flag passes the filter.
    pub fn admits(&self, activo: bool) -> bool {
        match self {
            ActiveFilter::All => true,
            ActiveFilter::Active => activo,
            ActiveFilter::Inactive => !activo,
        }
    }

    /// Next filter in the Active → Inactive → All cycle used by the filter key.
    pub fn cycle(self) -> Self {
        match self {
            ActiveFilter::Active => ActiveFilter::Inactive,
            ActiveFilter::Inactive => ActiveFilter::All,
            ActiveFilter::All => ActiveFilter::Active,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActiveFilter::All => "All",
            ActiveFilter::Active => "Active",
            ActiveFilter::Inactive => "Inactive",
        }
    }
}

/// Mode of the shared create/edit (ABM) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AbmMode {
    #[default]
    Crear,
    Editar,
}
