//! Per-resource configuration for the generic list screens.
//!
//! Every catalog screen is the same filterable, sortable, paginated CRUD
//! list. What differs is captured here: the REST path, the envelope keys the
//! API wraps payloads in, the permission that unlocks writes and the labels
//! shown to the user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog resources served under the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Categorias,
    Clasificaciones,
    Etiquetas,
    UnidadesMedida,
}

/// User-facing wording for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLabels {
    pub singular: &'static str,
    pub plural: &'static str,
    /// Label of the `descripcion` field in forms and column headers.
    pub descripcion: &'static str,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Categorias,
        Resource::Clasificaciones,
        Resource::Etiquetas,
        Resource::UnidadesMedida,
    ];

    /// Path segment below the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Categorias => "categorias",
            Resource::Clasificaciones => "clasificaciones",
            Resource::Etiquetas => "etiquetas",
            Resource::UnidadesMedida => "unidades-medida",
        }
    }

    /// Key holding the item array in list responses.
    pub fn list_key(&self) -> &'static str {
        match self {
            Resource::Categorias => "categorias",
            Resource::Clasificaciones => "clasificaciones",
            Resource::Etiquetas => "etiquetas",
            Resource::UnidadesMedida => "unidadesMedida",
        }
    }

    /// Key holding the single item in get/create/update responses.
    pub fn item_key(&self) -> &'static str {
        match self {
            Resource::Categorias => "categoria",
            Resource::Clasificaciones => "clasificacion",
            Resource::Etiquetas => "etiqueta",
            Resource::UnidadesMedida => "unidadMedida",
        }
    }

    /// Permission that grants create, edit and activation changes.
    pub fn write_permission(&self) -> &'static str {
        match self {
            Resource::Categorias => "CATEGORIAS_ALL",
            Resource::Clasificaciones => "CLASIFICACIONES_ALL",
            Resource::Etiquetas => "ETIQUETAS_ALL",
            Resource::UnidadesMedida => "UNIDADES_MEDIDA_ALL",
        }
    }

    pub fn labels(&self) -> ResourceLabels {
        match self {
            Resource::Categorias => ResourceLabels {
                singular: "category",
                plural: "Categories",
                descripcion: "Name",
            },
            Resource::Clasificaciones => ResourceLabels {
                singular: "classification",
                plural: "Classifications",
                descripcion: "Name",
            },
            Resource::Etiquetas => ResourceLabels {
                singular: "tag",
                plural: "Tags",
                descripcion: "Name",
            },
            Resource::UnidadesMedida => ResourceLabels {
                singular: "unit of measure",
                plural: "Units of Measure",
                descripcion: "Unit",
            },
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
