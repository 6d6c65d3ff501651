//! Navigation and view switching utilities.

use catalogo_core::Resource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Home,
    Categorias,
    Clasificaciones,
    Etiquetas,
    UnidadesMedida,
    /// Reached from the category list; not part of the tab cycle.
    CategoryDetail,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Categorias => "Categories",
            View::Clasificaciones => "Classifications",
            View::Etiquetas => "Tags",
            View::UnidadesMedida => "Units of measure",
            View::CategoryDetail => "Category detail",
        }
    }

    /// Views reachable with Tab and the digit keys.
    pub fn all() -> &'static [View] {
        &[
            View::Home,
            View::Categorias,
            View::Clasificaciones,
            View::Etiquetas,
            View::UnidadesMedida,
        ]
    }

    pub fn for_resource(resource: Resource) -> View {
        match resource {
            Resource::Categorias => View::Categorias,
            Resource::Clasificaciones => View::Clasificaciones,
            Resource::Etiquetas => View::Etiquetas,
            Resource::UnidadesMedida => View::UnidadesMedida,
        }
    }

    /// The list screen this view shows, if any.
    pub fn resource(&self) -> Option<Resource> {
        match self {
            View::Categorias => Some(Resource::Categorias),
            View::Clasificaciones => Some(Resource::Clasificaciones),
            View::Etiquetas => Some(Resource::Etiquetas),
            View::UnidadesMedida => Some(Resource::UnidadesMedida),
            View::Home | View::CategoryDetail => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::CategoryDetail => View::Categorias.index(),
            _ => Self::all().iter().position(|v| v == self).unwrap_or(0),
        }
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(View::Home.previous(), View::UnidadesMedida);
        assert_eq!(View::UnidadesMedida.next(), View::Home);
    }

    #[test]
    fn test_detail_cycles_from_categories() {
        assert_eq!(View::CategoryDetail.next(), View::Clasificaciones);
        assert_eq!(View::CategoryDetail.previous(), View::Home);
    }

    #[test]
    fn test_resource_views_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(View::for_resource(resource).resource(), Some(resource));
        }
    }
}
