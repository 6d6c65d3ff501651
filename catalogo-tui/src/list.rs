//! Generic filterable, sortable, paginated CRUD list.
//!
//! One `ListController` backs each catalog screen; the [`Resource`] it is
//! built with supplies the path, envelope keys and wording. The controller
//! owns the list state and the create/edit form, talks to the backend
//! through [`CatalogApi`] and reports outcomes through [`NotificationPort`].

use crate::api_client::{ApiClientError, CatalogApi};
use crate::debounce::{DebounceTicket, Debouncer};
use crate::error::ControllerError;
use crate::ports::{NotificationPort, Prompt};
use catalogo_core::{
    sort_by_descripcion, validate_descripcion, AbmMode, ActiveFilter, CatalogItem,
    CreateItemRequest, ItemId, ListPage, ListQuery, Resource, SortDirection, UpdateItemRequest,
    DEFAULT_SORT_COLUMN,
};
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Snapshot of one list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub items: Vec<CatalogItem>,
    pub total_count: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub sort_column: String,
    pub sort_direction: SortDirection,
    pub active_filter: ActiveFilter,
    pub search_text: String,
}

impl ListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            current_page: 1,
            page_size: page_size.max(1),
            sort_column: DEFAULT_SORT_COLUMN.to_string(),
            sort_direction: SortDirection::Asc,
            active_filter: ActiveFilter::Active,
            search_text: String::new(),
        }
    }

    pub fn page_count(&self) -> u32 {
        let pages = self.total_count.div_ceil(u64::from(self.page_size));
        pages.max(1).min(u64::from(u32::MAX)) as u32
    }
}

/// Scratch buffer of the create/edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct AbmForm {
    pub descripcion: String,
    pub mode: AbmMode,
    pub selected: Option<CatalogItem>,
}

/// A list fetch tagged with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub seq: u64,
    pub resource: Resource,
    pub query: ListQuery,
}

#[derive(Debug, Clone)]
pub struct ListController {
    resource: Resource,
    creator_user_id: String,
    state: ListState,
    form: Option<AbmForm>,
    search: Debouncer,
    latest_seq: u64,
    loading: bool,
}

impl ListController {
    pub fn new(resource: Resource, page_size: u32, creator_user_id: impl Into<String>) -> Self {
        Self {
            resource,
            creator_user_id: creator_user_id.into(),
            state: ListState::new(page_size),
            form: None,
            search: Debouncer::default(),
            latest_seq: 0,
            loading: false,
        }
    }

    pub fn with_search_debounce(mut self, window: Duration) -> Self {
        self.search = Debouncer::new(window);
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn form(&self) -> Option<&AbmForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut AbmForm> {
        self.form.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Search text typed but not yet committed by the debouncer.
    pub fn pending_search(&self) -> Option<&str> {
        self.search.pending()
    }

    pub fn can_write(&self, permissions: &[String]) -> bool {
        let required = self.resource.write_permission();
        permissions.iter().any(|p| p == required)
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            direccion: self.state.sort_direction,
            columna: self.state.sort_column.clone(),
            parametro: self.state.search_text.clone(),
            pagina: self.state.current_page,
            items_por_pagina: self.state.page_size,
            activo: self.state.active_filter,
        }
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Start a fetch. Only the response to the most recent request is applied.
    pub fn begin_refresh(&mut self) -> ListRequest {
        self.latest_seq += 1;
        self.loading = true;
        ListRequest {
            seq: self.latest_seq,
            resource: self.resource,
            query: self.query(),
        }
    }

    /// Apply a fetch result; returns whether it was applied.
    pub fn apply_list_response(
        &mut self,
        seq: u64,
        result: Result<ListPage, ApiClientError>,
        port: &dyn NotificationPort,
    ) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(
                resource = %self.resource,
                seq,
                latest = self.latest_seq,
                "Discarding stale list response"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.state.items = page.items;
                self.state.total_count = page.total_items;
                port.close();
                true
            }
            Err(err) => {
                tracing::warn!(resource = %self.resource, error = %err, "List refresh failed");
                port.error(&err.to_string());
                false
            }
        }
    }

    /// Run a staged request inline and apply its result.
    pub async fn run(
        &mut self,
        request: ListRequest,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> bool {
        port.loading();
        let result = api.list_items(request.resource, &request.query).await;
        self.apply_list_response(request.seq, result, port)
    }

    pub async fn refresh(&mut self, api: &dyn CatalogApi, port: &dyn NotificationPort) -> bool {
        let request = self.begin_refresh();
        self.run(request, api, port).await
    }

    // ------------------------------------------------------------------------
    // Filters, sorting and paging
    //
    // Each `stage_*` method updates the state and returns the fetch it
    // requires; the async counterparts run that fetch inline.
    // ------------------------------------------------------------------------

    /// Register a search keystroke. The caller settles the returned ticket
    /// once its delay has passed.
    pub fn search_keystroke(&mut self, text: impl Into<String>) -> DebounceTicket {
        self.search.push(text)
    }

    /// Commit the debounced search if `generation` is the latest keystroke.
    pub fn stage_settled_search(&mut self, generation: u64) -> Option<ListRequest> {
        let text = self.search.settle(generation)?;
        Some(self.stage_search_text(text))
    }

    pub async fn settle_search(
        &mut self,
        generation: u64,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> bool {
        match self.stage_settled_search(generation) {
            Some(request) => {
                self.run(request, api, port).await;
                true
            }
            None => false,
        }
    }

    /// Commit search text immediately and go back to page one.
    pub fn stage_search_text(&mut self, text: impl Into<String>) -> ListRequest {
        self.state.search_text = text.into();
        self.state.current_page = 1;
        self.begin_refresh()
    }

    pub async fn set_search_text(
        &mut self,
        text: impl Into<String>,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> bool {
        let request = self.stage_search_text(text);
        self.run(request, api, port).await
    }

    pub fn stage_active_filter(&mut self, filter: ActiveFilter) -> ListRequest {
        self.state.active_filter = filter;
        self.state.current_page = 1;
        self.begin_refresh()
    }

    pub async fn set_active_filter(
        &mut self,
        filter: ActiveFilter,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> bool {
        let request = self.stage_active_filter(filter);
        self.run(request, api, port).await
    }

    /// Column click: select the column and flip the direction.
    pub fn stage_sort(&mut self, column: impl Into<String>) -> ListRequest {
        self.state.sort_column = column.into();
        self.state.sort_direction = self.state.sort_direction.flipped();
        self.begin_refresh()
    }

    pub async fn sort_by_column(
        &mut self,
        column: impl Into<String>,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> bool {
        let request = self.stage_sort(column);
        self.run(request, api, port).await
    }

    pub fn stage_page(&mut self, page: u32) -> ListRequest {
        self.state.current_page = page.max(1);
        self.begin_refresh()
    }

    pub async fn change_page(
        &mut self,
        page: u32,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> bool {
        let request = self.stage_page(page);
        self.run(request, api, port).await
    }

    /// Re-sort the loaded page by description without a round trip.
    pub fn resort(&mut self) {
        sort_by_descripcion(&mut self.state.items, self.state.sort_direction);
    }

    // ------------------------------------------------------------------------
    // Create / edit workflow
    // ------------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.form = Some(AbmForm {
            descripcion: String::new(),
            mode: AbmMode::Crear,
            selected: None,
        });
    }

    pub fn open_edit(&mut self, item: &CatalogItem) {
        self.form = Some(AbmForm {
            descripcion: item.descripcion.clone(),
            mode: AbmMode::Editar,
            selected: Some(item.clone()),
        });
    }

    pub fn cancel_abm(&mut self) {
        self.form = None;
    }

    pub fn create_prompt(&self) -> Prompt {
        Prompt::new(format!("Creating {}", self.resource.labels().singular), "Accept")
    }

    pub fn update_prompt(&self) -> Prompt {
        Prompt::new(format!("Updating {}", self.resource.labels().singular), "Accept")
    }

    pub fn toggle_prompt(&self, item: &CatalogItem) -> Prompt {
        let singular = self.resource.labels().singular;
        if item.activo {
            Prompt::new(format!("Deactivate {}", singular), "Deactivate")
        } else {
            Prompt::new(format!("Activate {}", singular), "Activate")
        }
    }

    /// Prompt for whatever the open form would submit.
    pub fn submit_prompt(&self) -> Option<Prompt> {
        self.form.as_ref().map(|form| match form.mode {
            AbmMode::Crear => self.create_prompt(),
            AbmMode::Editar => self.update_prompt(),
        })
    }

    /// Submit the open form as a create or an update depending on its mode.
    pub async fn submit_abm(
        &mut self,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> Result<Option<CatalogItem>, ControllerError> {
        let Some(form) = self.form.clone() else {
            return Ok(None);
        };
        match (form.mode, form.selected) {
            (AbmMode::Editar, Some(selected)) => {
                self.update(&selected.id, &form.descripcion, api, port).await
            }
            _ => self.create(&form.descripcion, api, port).await,
        }
    }

    /// Create a record. `Ok(None)` means the operator declined the prompt.
    pub async fn create(
        &mut self,
        descripcion: &str,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> Result<Option<CatalogItem>, ControllerError> {
        let descripcion = self.validated(descripcion, port)?;
        if !port.confirm(&self.create_prompt()).await {
            return Ok(None);
        }

        port.loading();
        let body = CreateItemRequest {
            descripcion,
            creator_user_id: self.creator_user_id.clone(),
        };
        let created = self
            .report(api.create_item(self.resource, &body).await, port)?;

        tracing::info!(resource = %self.resource, id = %created.id, "Created catalog item");
        self.state.items.insert(0, created.clone());
        self.state.total_count += 1;
        self.resort();
        self.form = None;
        port.close();
        Ok(Some(created))
    }

    /// Rename a record. `Ok(None)` means the operator declined the prompt.
    pub async fn update(
        &mut self,
        id: &ItemId,
        descripcion: &str,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> Result<Option<CatalogItem>, ControllerError> {
        let descripcion = self.validated(descripcion, port)?;
        if !port.confirm(&self.update_prompt()).await {
            return Ok(None);
        }

        port.loading();
        let body = UpdateItemRequest::descripcion(descripcion);
        let updated = self
            .report(api.update_item(self.resource, id, &body).await, port)?;

        tracing::info!(resource = %self.resource, id = %updated.id, "Updated catalog item");
        for item in self.state.items.iter_mut().filter(|i| i.id == updated.id) {
            *item = updated.clone();
        }
        self.resort();
        self.form = None;
        port.close();
        Ok(Some(updated))
    }

    /// Flip `activo` and reload the page, since the item may no longer
    /// match the active filter. Returns whether the change was submitted.
    pub async fn toggle_active(
        &mut self,
        item: &CatalogItem,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> Result<bool, ControllerError> {
        if !port.confirm(&self.toggle_prompt(item)).await {
            return Ok(false);
        }

        port.loading();
        let body = UpdateItemRequest::activo(!item.activo);
        self.report(api.update_item(self.resource, &item.id, &body).await, port)?;
        tracing::info!(resource = %self.resource, id = %item.id, activo = !item.activo, "Toggled catalog item");
        self.refresh(api, port).await;
        Ok(true)
    }

    fn validated(&self, descripcion: &str, port: &dyn NotificationPort) -> Result<String, ControllerError> {
        validate_descripcion(self.resource.labels().singular, descripcion).map_err(|err| {
            port.info(&err.to_string());
            ControllerError::Validation(err)
        })
    }

    fn report<T>(
        &self,
        result: Result<T, ApiClientError>,
        port: &dyn NotificationPort,
    ) -> Result<T, ControllerError> {
        result.map_err(|err| {
            tracing::warn!(resource = %self.resource, error = %err, "Catalog write failed");
            port.error(&err.to_string());
            ControllerError::Api(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_list_screens() {
        let controller = ListController::new(Resource::Etiquetas, DEFAULT_PAGE_SIZE, "u1");
        let query = controller.query();
        assert_eq!(query.pagina, 1);
        assert_eq!(query.items_por_pagina, 10);
        assert_eq!(query.activo, ActiveFilter::Active);
        assert_eq!(query.columna, "descripcion");
        assert_eq!(query.direccion, SortDirection::Asc);
    }

    #[test]
    fn test_page_count() {
        let mut state = ListState::new(10);
        assert_eq!(state.page_count(), 1);
        state.total_count = 12;
        assert_eq!(state.page_count(), 2);
        state.total_count = 20;
        assert_eq!(state.page_count(), 2);
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut controller = ListController::new(Resource::Categorias, 10, "u1");
        let first = controller.begin_refresh();
        let second = controller.begin_refresh();
        assert!(second.seq > first.seq);
        assert!(controller.is_loading());
    }

    #[test]
    fn test_staging_resets_page() {
        let mut controller = ListController::new(Resource::Clasificaciones, 10, "u1");
        let request = controller.stage_page(0);
        assert_eq!(request.query.pagina, 1);
        controller.stage_page(3);
        let request = controller.stage_active_filter(ActiveFilter::Inactive);
        assert_eq!(request.query.pagina, 1);
        assert_eq!(request.query.activo, ActiveFilter::Inactive);

        controller.stage_page(2);
        let request = controller.stage_sort("descripcion");
        assert_eq!(request.query.pagina, 2);
        assert_eq!(request.query.direccion, SortDirection::Desc);
    }

    #[test]
    fn test_toggle_prompt_wording_depends_on_state() {
        let controller = ListController::new(Resource::Categorias, 10, "u1");
        let active = CatalogItem::new("1", "Frutas");
        let inactive = CatalogItem::new("2", "Verduras").with_activo(false);
        assert_eq!(controller.toggle_prompt(&active).button, "Deactivate");
        assert_eq!(controller.toggle_prompt(&inactive).button, "Activate");
    }

    #[test]
    fn test_write_permission() {
        let controller = ListController::new(Resource::UnidadesMedida, 10, "u1");
        assert!(controller.can_write(&["UNIDADES_MEDIDA_ALL".to_string()]));
        assert!(!controller.can_write(&["CATEGORIAS_ALL".to_string()]));
    }

    #[test]
    fn test_open_edit_prefills_form() {
        let mut controller = ListController::new(Resource::Categorias, 10, "u1");
        let item = CatalogItem::new("1", "Frutas");
        controller.open_edit(&item);
        let form = controller.form().unwrap();
        assert_eq!(form.mode, AbmMode::Editar);
        assert_eq!(form.descripcion, "Frutas");
        assert_eq!(controller.submit_prompt().unwrap().message, "Updating category");
        controller.cancel_abm();
        assert!(controller.form().is_none());
    }
}
