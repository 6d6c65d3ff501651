//! Catalogo Test Utilities
//!
//! Shared test infrastructure for the catalogo workspace:
//! - An in-memory [`CatalogApi`] with failure injection and call recording
//! - A recording [`NotificationPort`]
//! - Proptest generators for catalog entities
//! - Fixtures and custom assertions

pub use catalogo_core::{
    ActiveFilter, CatalogItem, CreateItemRequest, CreateOccurrenceRequest, ItemId, ItemRef,
    ListPage, ListQuery, OccurrenceQuery, Resource, SortDirection, TagOccurrence,
    UpdateItemRequest, RATING_COLUMN,
};
pub use catalogo_tui::api_client::{ApiClientError, CatalogApi};
pub use catalogo_tui::ports::{NotificationPort, Prompt};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ============================================================================
// IN-MEMORY CATALOG
// ============================================================================

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List(Resource, ListQuery),
    Get(Resource, ItemId),
    Create(Resource, CreateItemRequest),
    Update(Resource, ItemId, UpdateItemRequest),
    ListOccurrences(OccurrenceQuery),
    CreateOccurrence(CreateOccurrenceRequest),
}

impl ApiCall {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            ApiCall::Create(..) | ApiCall::Update(..) | ApiCall::CreateOccurrence(_)
        )
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    items: HashMap<Resource, Vec<CatalogItem>>,
    occurrences: Vec<TagOccurrence>,
    next_id: u64,
    calls: Vec<ApiCall>,
    /// Every call fails with this status and message while set.
    failure: Option<(u16, String)>,
    /// Writes go through while a failure is set.
    reads_only: bool,
}

/// In-memory stand-in for the REST backend.
///
/// Listing honors the same query parameters the server does: the `activo`
/// filter, a case-insensitive `parametro` match on `descripcion`, ordering by
/// `columna`/`direccion` and paging.
#[derive(Debug, Default)]
pub struct MockCatalog {
    state: Mutex<CatalogState>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(self, resource: Resource, items: Vec<CatalogItem>) -> Self {
        self.lock().items.insert(resource, items);
        self
    }

    pub fn with_occurrences(self, occurrences: Vec<TagOccurrence>) -> Self {
        self.lock().occurrences = occurrences;
        self
    }

    /// Make every following call fail with an API error.
    pub fn fail_with(&self, status: u16, message: impl Into<String>) {
        let mut state = self.lock();
        state.failure = Some((status, message.into()));
        state.reads_only = false;
    }

    /// Make every following read fail while writes still succeed.
    pub fn fail_reads_with(&self, status: u16, message: impl Into<String>) {
        let mut state = self.lock();
        state.failure = Some((status, message.into()));
        state.reads_only = true;
    }

    pub fn recover(&self) {
        let mut state = self.lock();
        state.failure = None;
        state.reads_only = false;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Number of calls that would have written to the backend.
    pub fn write_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.is_write())
            .count()
    }

    pub fn items(&self, resource: Resource) -> Vec<CatalogItem> {
        self.lock().items.get(&resource).cloned().unwrap_or_default()
    }

    pub fn occurrences(&self) -> Vec<TagOccurrence> {
        self.lock().occurrences.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        // A panicking test thread must not hide the state from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: ApiCall) -> Result<std::sync::MutexGuard<'_, CatalogState>, ApiClientError> {
        let mut state = self.lock();
        let spared = state.reads_only && call.is_write();
        state.calls.push(call);
        if let Some((status, message)) = state.failure.clone().filter(|_| !spared) {
            return Err(ApiClientError::Api { status, message });
        }
        Ok(state)
    }
}

fn not_found(resource: impl std::fmt::Display, id: &ItemId) -> ApiClientError {
    ApiClientError::Api {
        status: 404,
        message: format!("{} {} not found", resource, id),
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn list_items(&self, resource: Resource, query: &ListQuery) -> Result<ListPage, ApiClientError> {
        let state = self.record(ApiCall::List(resource, query.clone()))?;
        let needle = query.parametro.to_lowercase();
        let mut matching: Vec<CatalogItem> = state
            .items
            .get(&resource)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| query.activo.admits(item.activo))
                    .filter(|item| item.descripcion.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if query.columna == RATING_COLUMN {
            matching.sort_by_key(|item| item.rating());
            if query.direccion == SortDirection::Desc {
                matching.reverse();
            }
        } else {
            catalogo_core::sort_by_descripcion(&mut matching, query.direccion);
        }

        let total_items = matching.len() as u64;
        let per_page = query.items_por_pagina.max(1) as usize;
        let skip = (query.pagina.max(1) as usize - 1).saturating_mul(per_page);
        let items = matching.into_iter().skip(skip).take(per_page).collect();
        Ok(ListPage { items, total_items })
    }

    async fn get_item(&self, resource: Resource, id: &ItemId) -> Result<CatalogItem, ApiClientError> {
        let state = self.record(ApiCall::Get(resource, id.clone()))?;
        state
            .items
            .get(&resource)
            .and_then(|items| items.iter().find(|item| &item.id == id))
            .cloned()
            .ok_or_else(|| not_found(resource, id))
    }

    async fn create_item(
        &self,
        resource: Resource,
        body: &CreateItemRequest,
    ) -> Result<CatalogItem, ApiClientError> {
        let mut state = self.record(ApiCall::Create(resource, body.clone()))?;
        state.next_id += 1;
        let mut item = CatalogItem::new(format!("{}-{}", resource.path(), state.next_id), body.descripcion.clone());
        item.created_at = Some(Utc::now());
        state.items.entry(resource).or_default().push(item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        resource: Resource,
        id: &ItemId,
        body: &UpdateItemRequest,
    ) -> Result<CatalogItem, ApiClientError> {
        let mut state = self.record(ApiCall::Update(resource, id.clone(), body.clone()))?;
        let item = state
            .items
            .get_mut(&resource)
            .and_then(|items| items.iter_mut().find(|item| &item.id == id))
            .ok_or_else(|| not_found(resource, id))?;
        if let Some(descripcion) = &body.descripcion {
            item.descripcion = descripcion.clone();
        }
        if let Some(activo) = body.activo {
            item.activo = activo;
        }
        Ok(item.clone())
    }

    async fn list_occurrences(&self, query: &OccurrenceQuery) -> Result<Vec<TagOccurrence>, ApiClientError> {
        let state = self.record(ApiCall::ListOccurrences(query.clone()))?;
        let mut occurrences: Vec<TagOccurrence> = state
            .occurrences
            .iter()
            .filter(|occurrence| occurrence.category_id() == &query.categoria_id)
            .cloned()
            .collect();
        occurrences.sort_by_key(|occurrence| occurrence.created_at);
        if query.direccion == SortDirection::Desc {
            occurrences.reverse();
        }
        Ok(occurrences)
    }

    async fn create_occurrence(
        &self,
        body: &CreateOccurrenceRequest,
    ) -> Result<TagOccurrence, ApiClientError> {
        let mut state = self.record(ApiCall::CreateOccurrence(body.clone()))?;
        state.next_id += 1;
        // Tags come back populated, like the server's joined query.
        let etiqueta = state
            .items
            .get(&Resource::Etiquetas)
            .and_then(|tags| tags.iter().find(|tag| tag.id == body.etiqueta_id))
            .cloned()
            .map(ItemRef::Item)
            .unwrap_or_else(|| ItemRef::Id(body.etiqueta_id.clone()));
        let occurrence = TagOccurrence {
            id: ItemId::new(format!("aparicion-{}", state.next_id)),
            etiqueta,
            categoria_id: ItemRef::Id(body.categoria_id.clone()),
            clasificacion_id: ItemRef::Id(body.clasificacion_id.clone()),
            created_at: Some(Utc::now() + Duration::milliseconds(state.next_id as i64)),
        };
        state.occurrences.push(occurrence.clone());
        Ok(occurrence)
    }
}

// ============================================================================
// RECORDING NOTIFICATION PORT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PortEvent {
    Loading,
    Close,
    Confirm(Prompt),
    Success(String),
    Info(String),
    Error(String),
}

/// Notification port that records everything and answers prompts with a
/// fixed answer (accept by default).
#[derive(Debug)]
pub struct RecordingPort {
    events: Mutex<Vec<PortEvent>>,
    accept: AtomicBool,
}

impl RecordingPort {
    pub fn accepting() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            accept: AtomicBool::new(true),
        }
    }

    pub fn declining() -> Self {
        let port = Self::accepting();
        port.accept.store(false, Ordering::SeqCst);
        port
    }

    pub fn events(&self) -> Vec<PortEvent> {
        self.lock().clone()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.filter_map(|event| match event {
            PortEvent::Confirm(prompt) => Some(prompt.clone()),
            _ => None,
        })
    }

    pub fn infos(&self) -> Vec<String> {
        self.filter_map(|event| match event {
            PortEvent::Info(message) => Some(message.clone()),
            _ => None,
        })
    }

    pub fn successes(&self) -> Vec<String> {
        self.filter_map(|event| match event {
            PortEvent::Success(message) => Some(message.clone()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.filter_map(|event| match event {
            PortEvent::Error(message) => Some(message.clone()),
            _ => None,
        })
    }

    fn filter_map<T>(&self, f: impl Fn(&PortEvent) -> Option<T>) -> Vec<T> {
        self.lock().iter().filter_map(f).collect()
    }

    fn push(&self, event: PortEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PortEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RecordingPort {
    fn default() -> Self {
        Self::accepting()
    }
}

#[async_trait]
impl NotificationPort for RecordingPort {
    fn loading(&self) {
        self.push(PortEvent::Loading);
    }

    fn close(&self) {
        self.push(PortEvent::Close);
    }

    async fn confirm(&self, prompt: &Prompt) -> bool {
        self.push(PortEvent::Confirm(prompt.clone()));
        self.accept.load(Ordering::SeqCst)
    }

    fn success(&self, message: &str) {
        self.push(PortEvent::Success(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.push(PortEvent::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(PortEvent::Error(message.to_string()));
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for catalog entities.

    use super::*;
    use proptest::prelude::*;

    /// Description with at least one visible character.
    pub fn arb_descripcion() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ]{0,15}"
    }

    pub fn arb_blank() -> impl Strategy<Value = String> {
        "[ \t\n]{0,6}"
    }

    pub fn arb_sort_direction() -> impl Strategy<Value = SortDirection> {
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]
    }

    pub fn arb_active_filter() -> impl Strategy<Value = ActiveFilter> {
        prop_oneof![
            Just(ActiveFilter::All),
            Just(ActiveFilter::Active),
            Just(ActiveFilter::Inactive),
        ]
    }

    pub fn arb_resource() -> impl Strategy<Value = Resource> {
        prop::sample::select(Resource::ALL.to_vec())
    }

    /// Items with unique ids `1..=n`.
    pub fn arb_items(max: usize) -> impl Strategy<Value = Vec<CatalogItem>> {
        prop::collection::vec((arb_descripcion(), any::<bool>()), 0..max).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (descripcion, activo))| {
                    CatalogItem::new((i + 1).to_string(), descripcion).with_activo(activo)
                })
                .collect()
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built catalogs for common scenarios.

    use super::*;

    pub const USER_ID: &str = "user-1";

    /// `count` active items named "Item 01", "Item 02", ...
    pub fn numbered_items(count: usize) -> Vec<CatalogItem> {
        (1..=count)
            .map(|i| CatalogItem::new(i.to_string(), format!("Item {:02}", i)))
            .collect()
    }

    pub fn fruit_categories() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("c1", "Frutas"),
            CatalogItem::new("c2", "Verduras"),
            CatalogItem::new("c3", "Lácteos").with_activo(false),
        ]
    }

    pub fn classifications() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("k1", "Sabor").with_puntuacion(5),
            CatalogItem::new("k2", "Textura").with_puntuacion(3),
            CatalogItem::new("k3", "Aroma").with_puntuacion(1),
            CatalogItem::new("k4", "Color").with_puntuacion(4).with_activo(false),
        ]
    }

    pub fn tags() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("t1", "Dulce"),
            CatalogItem::new("t2", "Ácido"),
            CatalogItem::new("t3", "Crujiente"),
            CatalogItem::new("t4", "Retirada").with_activo(false),
        ]
    }

    /// Occurrence with a bare tag id, as older records are returned.
    pub fn occurrence(id: &str, tag: &str, category: &str, classification: &str) -> TagOccurrence {
        TagOccurrence {
            id: ItemId::new(id),
            etiqueta: ItemRef::Id(ItemId::new(tag)),
            categoria_id: ItemRef::Id(ItemId::new(category)),
            clasificacion_id: ItemRef::Id(ItemId::new(classification)),
            created_at: Some(Utc::now()),
        }
    }

    /// Categories, classifications and tags, with "Dulce" recorded for
    /// "Frutas" under "Sabor".
    pub fn tagging_catalog() -> MockCatalog {
        MockCatalog::new()
            .with_items(Resource::Categorias, fruit_categories())
            .with_items(Resource::Clasificaciones, classifications())
            .with_items(Resource::Etiquetas, tags())
            .with_occurrences(vec![
                occurrence("o1", "t1", "c1", "k1"),
                occurrence("o2", "t3", "c2", "k2"),
            ])
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over controller-visible state.

    use super::*;

    /// Assert that descriptions follow the given direction, case-insensitively.
    #[track_caller]
    pub fn assert_sorted(items: &[CatalogItem], direction: SortDirection) {
        for pair in items.windows(2) {
            let ordering =
                catalogo_core::compare_descripcion(&pair[0].descripcion, &pair[1].descripcion, direction);
            assert_ne!(
                ordering,
                std::cmp::Ordering::Greater,
                "{:?} sorted before {:?} in {} order",
                pair[0].descripcion,
                pair[1].descripcion,
                direction
            );
        }
    }

    #[track_caller]
    pub fn assert_no_writes(catalog: &MockCatalog) {
        assert_eq!(catalog.write_count(), 0, "unexpected writes: {:?}", catalog.calls());
    }

    #[track_caller]
    pub fn assert_ids(items: &[CatalogItem], expected: &[&str]) {
        let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, expected);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_filters_and_pages() {
        let catalog = MockCatalog::new().with_items(Resource::Etiquetas, fixtures::numbered_items(12));
        let query = ListQuery {
            items_por_pagina: 10,
            pagina: 2,
            ..ListQuery::default()
        };
        let page = catalog.list_items(Resource::Etiquetas, &query).await.unwrap();
        assert_eq!(page.total_items, 12);
        assertions::assert_ids(&page.items, &["11", "12"]);
    }

    #[tokio::test]
    async fn test_mock_ranks_by_rating() {
        let catalog = fixtures::tagging_catalog();
        let page = catalog
            .list_items(Resource::Clasificaciones, &ListQuery::ranked_active())
            .await
            .unwrap();
        assertions::assert_ids(&page.items, &["k1", "k2", "k3"]);
    }

    #[tokio::test]
    async fn test_mock_failure_is_recorded() {
        let catalog = MockCatalog::new();
        catalog.fail_with(500, "Error interno");
        let err = catalog
            .get_item(Resource::Categorias, &ItemId::new("c1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error interno");
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_read_failure_spares_writes() {
        let catalog = fixtures::tagging_catalog();
        catalog.fail_reads_with(503, "Servicio no disponible");
        let body = CreateItemRequest {
            descripcion: "Granos".to_string(),
            creator_user_id: fixtures::USER_ID.to_string(),
        };
        assert!(catalog.create_item(Resource::Categorias, &body).await.is_ok());
        assert!(catalog
            .get_item(Resource::Categorias, &ItemId::new("c1"))
            .await
            .is_err());
        catalog.recover();
        assert!(catalog
            .get_item(Resource::Categorias, &ItemId::new("c1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_recording_port_answers() {
        let port = RecordingPort::declining();
        assert!(!port.confirm(&Prompt::new("Creating tag", "Accept")).await);
        assert_eq!(port.prompts().len(), 1);
    }
}
