//! Event handling: routes keys and background results into the controllers.

use crate::debounce::spawn_settle_timer;
use crate::detail::RelationDialog;
use crate::events::TuiEvent;
use crate::keys::{map_key, Action};
use crate::nav::View;
use crate::ports::{NotificationPort, PreConfirmed};
use crate::state::{App, ConfirmModal, InputMode, PendingAction};
use catalogo_core::{validate_descripcion, ItemId, Resource, DEFAULT_SORT_COLUMN};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle one event; returns `true` when the app should exit.
pub async fn handle_event(app: &mut App, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => return handle_key(app, key).await,
        TuiEvent::SearchSettled { resource, generation } => {
            let view = app.lists.get_mut(resource);
            if let Some(request) = view.controller.stage_settled_search(generation) {
                view.selected = 0;
                app.dispatch(request);
            }
        }
        TuiEvent::ListLoaded { resource, seq, result } => {
            let view = app.lists.get_mut(resource);
            if view.controller.apply_list_response(seq, result, &app.notifier) {
                view.clamp_selection();
            }
        }
        TuiEvent::Resize { .. } => {}
    }
    false
}

async fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if app.help_visible {
        app.help_visible = false;
        return false;
    }
    match app.input.clone() {
        InputMode::Search(text) => {
            handle_search_key(app, key, text);
            return false;
        }
        InputMode::Form => {
            handle_form_key(app, key);
            return false;
        }
        InputMode::Confirm(modal) => {
            handle_confirm_key(app, key, modal).await;
            return false;
        }
        InputMode::Normal => {}
    }
    if app.active_view == View::CategoryDetail && app.detail.controller.dialog().is_open() {
        handle_dialog_key(app, key).await;
        return false;
    }
    match map_key(key) {
        Some(action) => handle_action(app, action).await,
        None => false,
    }
}

/// Normal-mode actions.
pub async fn handle_action(app: &mut App, action: Action) -> bool {
    match action {
        Action::Quit => return true,
        Action::OpenHelp => app.help_visible = true,
        Action::NextView => {
            let next = app.active_view.next();
            switch_view(app, next);
        }
        Action::PrevView => {
            let previous = app.active_view.previous();
            switch_view(app, previous);
        }
        Action::SwitchView(index) => {
            if let Some(view) = View::from_index(index) {
                switch_view(app, view);
            }
        }
        Action::MoveDown => move_cursor(app, true),
        Action::MoveUp => move_cursor(app, false),
        Action::Refresh => refresh_active_view(app).await,
        Action::Confirm => confirm_selection(app).await,
        Action::Cancel => {
            if app.active_view == View::CategoryDetail {
                app.active_view = View::Categorias;
            }
        }
        Action::OpenSearch => {
            if let Some(list) = app.active_list() {
                let current = list
                    .controller
                    .pending_search()
                    .unwrap_or(&list.controller.state().search_text)
                    .to_string();
                app.input = InputMode::Search(current);
            }
        }
        Action::CycleActiveFilter => {
            if let Some(list) = app.active_list_mut() {
                let next = list.controller.state().active_filter.cycle();
                let request = list.controller.stage_active_filter(next);
                list.selected = 0;
                app.dispatch(request);
            }
        }
        Action::ToggleSort => {
            if let Some(list) = app.active_list_mut() {
                let request = list.controller.stage_sort(DEFAULT_SORT_COLUMN);
                app.dispatch(request);
            }
        }
        Action::PrevPage | Action::NextPage => {
            if let Some(list) = app.active_list_mut() {
                let state = list.controller.state();
                let page = match action {
                    Action::NextPage if state.current_page < state.page_count() => state.current_page + 1,
                    Action::PrevPage if state.current_page > 1 => state.current_page - 1,
                    _ => return false,
                };
                let request = list.controller.stage_page(page);
                list.selected = 0;
                app.dispatch(request);
            }
        }
        Action::NewItem => {
            if let Some(resource) = writable_resource(app) {
                app.lists.get_mut(resource).controller.open_create();
                app.input = InputMode::Form;
            }
        }
        Action::EditItem => {
            if let Some(resource) = writable_resource(app) {
                let list = app.lists.get_mut(resource);
                if let Some(item) = list.selected_item().cloned() {
                    list.controller.open_edit(&item);
                    app.input = InputMode::Form;
                }
            }
        }
        Action::ToggleActive => {
            if let Some(resource) = writable_resource(app) {
                let list = app.lists.get(resource);
                if let Some(item) = list.selected_item().cloned() {
                    app.input = InputMode::Confirm(ConfirmModal {
                        prompt: list.controller.toggle_prompt(&item),
                        action: PendingAction::ToggleActive(resource, item),
                    });
                }
            }
        }
        Action::AddRelation => {
            if app.active_view == View::CategoryDetail && app.detail.controller.category().is_some() {
                app.detail.controller.open_relation_dialog(None);
                app.detail.picker_selected = 0;
            }
        }
    }
    false
}

/// Resource of the active list when the session may write to it.
fn writable_resource(app: &App) -> Option<Resource> {
    let list = app.active_list()?;
    if list.controller.can_write(app.permissions()) {
        Some(list.controller.resource())
    } else {
        app.notifier.info(&format!(
            "You do not have permission to modify {}",
            list.controller.resource().labels().plural.to_lowercase()
        ));
        None
    }
}

fn switch_view(app: &mut App, view: View) {
    app.active_view = view;
    if let Some(list) = app.active_list_mut() {
        let request = list.controller.begin_refresh();
        app.dispatch(request);
    }
}

fn move_cursor(app: &mut App, down: bool) {
    match app.active_view {
        View::Home => {
            let last = Resource::ALL.len() - 1;
            app.home_selected = if down {
                (app.home_selected + 1).min(last)
            } else {
                app.home_selected.saturating_sub(1)
            };
        }
        View::CategoryDetail => {
            let len = app.detail.controller.classifications().len();
            if down && len > 0 {
                app.detail.selected = (app.detail.selected + 1).min(len - 1);
            } else if !down {
                app.detail.selected = app.detail.selected.saturating_sub(1);
            }
        }
        _ => {
            if let Some(list) = app.active_list_mut() {
                if down {
                    list.select_next();
                } else {
                    list.select_previous();
                }
            }
        }
    }
}

async fn confirm_selection(app: &mut App) {
    match app.active_view {
        View::Home => {
            if let Some(resource) = Resource::ALL.get(app.home_selected).copied() {
                switch_view(app, View::for_resource(resource));
            }
        }
        View::Categorias => {
            let selected = app.lists.get(Resource::Categorias).selected_item().map(|c| c.id.clone());
            if let Some(id) = selected {
                open_category(app, &id).await;
            }
        }
        View::CategoryDetail => {
            let classification = app.detail.selected_classification().cloned();
            if classification.is_some() {
                app.detail.controller.open_relation_dialog(classification);
                app.detail.picker_selected = 0;
            }
        }
        View::Clasificaciones | View::Etiquetas | View::UnidadesMedida => {}
    }
}

/// Show the detail screen of a category. On failure the current view stays
/// and the error is already on the status line.
pub async fn open_category(app: &mut App, id: &ItemId) {
    let loaded = app
        .detail
        .controller
        .load(id, app.api.as_ref(), &app.notifier)
        .await;
    match loaded {
        Ok(()) => {
            app.active_view = View::CategoryDetail;
            app.detail.selected = 0;
            app.detail.picker_selected = 0;
        }
        Err(err) => tracing::debug!(category = %id, error = %err, "Category detail not opened"),
    }
}

async fn refresh_active_view(app: &mut App) {
    if app.active_view == View::CategoryDetail {
        if let Some(id) = app.detail.controller.category().map(|c| c.id.clone()) {
            open_category(app, &id).await;
        }
        return;
    }
    if let Some(list) = app.active_list_mut() {
        let request = list.controller.begin_refresh();
        app.dispatch(request);
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent, mut text: String) {
    let Some(resource) = app.active_view.resource() else {
        app.input = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input = InputMode::Normal;
            return;
        }
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Char(c) => text.push(c),
        _ => return,
    }
    let ticket = app.lists.get_mut(resource).controller.search_keystroke(text.clone());
    spawn_settle_timer(app.sender.clone(), resource, ticket);
    app.input = InputMode::Search(text);
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    let Some(resource) = app.active_view.resource() else {
        app.input = InputMode::Normal;
        return;
    };
    let controller = &mut app.lists.get_mut(resource).controller;
    match key.code {
        KeyCode::Esc => {
            controller.cancel_abm();
            app.input = InputMode::Normal;
        }
        KeyCode::Backspace => {
            if let Some(form) = controller.form_mut() {
                form.descripcion.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = controller.form_mut() {
                form.descripcion.push(c);
            }
        }
        KeyCode::Enter => {
            let Some(form) = controller.form() else {
                app.input = InputMode::Normal;
                return;
            };
            // Validation comes before the confirmation, as in the controller.
            if let Err(err) = validate_descripcion(resource.labels().singular, &form.descripcion) {
                app.notifier.info(&err.to_string());
                return;
            }
            if let Some(prompt) = controller.submit_prompt() {
                app.input = InputMode::Confirm(ConfirmModal {
                    prompt,
                    action: PendingAction::SubmitForm(resource),
                });
            }
        }
        _ => {}
    }
}

async fn handle_confirm_key(app: &mut App, key: KeyEvent, modal: ConfirmModal) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') => {}
        KeyCode::Esc | KeyCode::Char('n') => {
            // Declining a form submission returns to the form.
            app.input = match modal.action {
                PendingAction::SubmitForm(_) => InputMode::Form,
                PendingAction::ToggleActive(..) => InputMode::Normal,
            };
            return;
        }
        _ => return,
    }

    let port = PreConfirmed(&app.notifier);
    match modal.action {
        PendingAction::SubmitForm(resource) => {
            let list = app.lists.get_mut(resource);
            let outcome = list.controller.submit_abm(app.api.as_ref(), &port).await;
            app.input = match outcome {
                Ok(_) => InputMode::Normal,
                Err(_) => InputMode::Form,
            };
        }
        PendingAction::ToggleActive(resource, item) => {
            let list = app.lists.get_mut(resource);
            let _ = list.controller.toggle_active(&item, app.api.as_ref(), &port).await;
            list.clamp_selection();
            app.input = InputMode::Normal;
        }
    }
}

async fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    let detail = &mut app.detail;
    match detail.controller.dialog().clone() {
        RelationDialog::Closed => {}
        RelationDialog::SelectingClassification => match key.code {
            KeyCode::Esc => detail.controller.close_relation_dialog(),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = detail.controller.classifications().len();
                if len > 0 {
                    detail.picker_selected = (detail.picker_selected + 1).min(len - 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                detail.picker_selected = detail.picker_selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                let chosen = detail.controller.classifications().get(detail.picker_selected).cloned();
                if let Some(classification) = chosen {
                    detail.controller.pick_classification(classification);
                    detail.picker_selected = 0;
                }
            }
            _ => {}
        },
        RelationDialog::SelectingTag { mut filter, .. } => match key.code {
            KeyCode::Esc => detail.controller.close_relation_dialog(),
            KeyCode::Down => {
                let len = detail.controller.tag_choices().len();
                if len > 0 {
                    detail.picker_selected = (detail.picker_selected + 1).min(len - 1);
                }
            }
            KeyCode::Up => detail.picker_selected = detail.picker_selected.saturating_sub(1),
            KeyCode::Backspace => {
                filter.pop();
                detail.controller.set_tag_filter(filter);
                detail.picker_selected = 0;
            }
            KeyCode::Char(c) => {
                filter.push(c);
                detail.controller.set_tag_filter(filter);
                detail.picker_selected = 0;
            }
            KeyCode::Enter => {
                let tag = detail.controller.tag_choices().get(detail.picker_selected).map(|t| (*t).clone());
                if let Some(tag) = tag {
                    let _ = detail
                        .controller
                        .add_occurrence(&tag, app.api.as_ref(), &app.notifier)
                        .await;
                }
            }
            _ => {}
        },
    }
}
