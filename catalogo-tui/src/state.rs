//! Application state and view state definitions.

use crate::api_client::CatalogApi;
use crate::config::TuiConfig;
use crate::detail::DetailController;
use crate::events::TuiEvent;
use crate::list::{ListController, ListRequest};
use crate::nav::View;
use crate::notifications::Notifier;
use crate::persistence::PersistedState;
use crate::ports::Prompt;
use crate::theme::Theme;
use catalogo_core::{CatalogItem, ItemId, Resource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// One catalog list screen: its controller plus the cursor.
#[derive(Debug, Clone)]
pub struct ListView {
    pub controller: ListController,
    pub selected: usize,
}

impl ListView {
    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.controller.state().items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.controller.state().items.len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the cursor inside the current page after a reload.
    pub fn clamp_selection(&mut self) {
        let len = self.controller.state().items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// The four list screens, one per [`Resource`].
#[derive(Debug, Clone)]
pub struct ListViews {
    categorias: ListView,
    clasificaciones: ListView,
    etiquetas: ListView,
    unidades_medida: ListView,
}

impl ListViews {
    pub fn new(page_size: u32, creator_user_id: &str, debounce: Duration) -> Self {
        let view = |resource| ListView {
            controller: ListController::new(resource, page_size, creator_user_id)
                .with_search_debounce(debounce),
            selected: 0,
        };
        Self {
            categorias: view(Resource::Categorias),
            clasificaciones: view(Resource::Clasificaciones),
            etiquetas: view(Resource::Etiquetas),
            unidades_medida: view(Resource::UnidadesMedida),
        }
    }

    pub fn get(&self, resource: Resource) -> &ListView {
        match resource {
            Resource::Categorias => &self.categorias,
            Resource::Clasificaciones => &self.clasificaciones,
            Resource::Etiquetas => &self.etiquetas,
            Resource::UnidadesMedida => &self.unidades_medida,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut ListView {
        match resource {
            Resource::Categorias => &mut self.categorias,
            Resource::Clasificaciones => &mut self.clasificaciones,
            Resource::Etiquetas => &mut self.etiquetas,
            Resource::UnidadesMedida => &mut self.unidades_medida,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub controller: DetailController,
    /// Cursor over the ranked classifications.
    pub selected: usize,
    /// Cursor inside the relation dialog's current step.
    pub picker_selected: usize,
}

impl DetailView {
    pub fn selected_classification(&self) -> Option<&CatalogItem> {
        self.controller.classifications().get(self.selected)
    }
}

/// A write that runs once the operator accepts the confirmation modal.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    SubmitForm(Resource),
    ToggleActive(Resource, CatalogItem),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmModal {
    pub prompt: Prompt,
    pub action: PendingAction,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box of a list screen.
    Search(String),
    /// Typing into the open create/edit form.
    Form,
    Confirm(ConfirmModal),
}

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    pub api: Arc<dyn CatalogApi>,
    pub sender: mpsc::Sender<TuiEvent>,
    pub notifier: Notifier,
    pub active_view: View,
    pub home_selected: usize,
    pub lists: ListViews,
    pub detail: DetailView,
    pub input: InputMode,
    pub help_visible: bool,
}

impl App {
    pub fn new(config: TuiConfig, api: Arc<dyn CatalogApi>, sender: mpsc::Sender<TuiEvent>) -> Self {
        let theme = Theme::from_name(&config.theme.name).unwrap_or_default();
        let debounce = Duration::from_millis(config.search_debounce_ms);
        let lists = ListViews::new(config.page_size, &config.session.user_id, debounce);
        let detail = DetailView {
            controller: DetailController::new(config.session.user_id.clone()),
            selected: 0,
            picker_selected: 0,
        };
        Self {
            config,
            theme,
            api,
            sender,
            notifier: Notifier::new(),
            active_view: View::Home,
            home_selected: 0,
            lists,
            detail,
            input: InputMode::Normal,
            help_visible: false,
        }
    }

    pub fn permissions(&self) -> &[String] {
        &self.config.session.permissions
    }

    /// The list screen currently shown, if any.
    pub fn active_list(&self) -> Option<&ListView> {
        self.active_view.resource().map(|resource| self.lists.get(resource))
    }

    pub fn active_list_mut(&mut self) -> Option<&mut ListView> {
        self.active_view.resource().map(|resource| self.lists.get_mut(resource))
    }

    /// Run a list fetch off the event loop; the result comes back as
    /// [`TuiEvent::ListLoaded`].
    pub fn dispatch(&self, request: ListRequest) {
        use crate::ports::NotificationPort;

        self.notifier.loading();
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let ListRequest { seq, resource, query } = request;
            tracing::debug!(resource = %resource, seq, page = query.pagina, "Fetching list page");
            let result = api.list_items(resource, &query).await;
            let _ = sender.send(TuiEvent::ListLoaded { resource, seq, result }).await;
        });
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            active_view: self.active_view,
            last_category_id: self.detail.controller.category().map(|c| c.id.clone()),
        }
    }

    /// Category to reopen on start, if the last session ended on its detail.
    pub fn restore(&mut self, state: PersistedState) -> Option<ItemId> {
        match (state.active_view, state.last_category_id) {
            (View::CategoryDetail, Some(id)) => Some(id),
            (View::CategoryDetail, None) => {
                self.active_view = View::Categorias;
                None
            }
            (view, _) => {
                self.active_view = view;
                None
            }
        }
    }
}
