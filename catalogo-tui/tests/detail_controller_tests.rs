use catalogo_core::{
    ActiveFilter, CatalogItem, ItemId, ItemRef, PartialItem, Resource, SortDirection, RATING_COLUMN,
};
use catalogo_test_utils::assertions::{assert_ids, assert_no_writes};
use catalogo_test_utils::fixtures::{occurrence, tagging_catalog, USER_ID};
use catalogo_test_utils::{ApiCall, RecordingPort};
use catalogo_tui::detail::{DetailController, RelationDialog};
use catalogo_tui::error::ControllerError;

fn id(raw: &str) -> ItemId {
    ItemId::new(raw)
}

fn descriptions(items: Vec<&CatalogItem>) -> Vec<String> {
    items.into_iter().map(|item| item.descripcion.clone()).collect()
}

#[tokio::test]
async fn load_ranks_active_classifications() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);

    detail.load(&id("c1"), &catalog, &port).await.unwrap();

    assert_eq!(detail.category().unwrap().descripcion, "Frutas");
    assert_ids(detail.classifications(), &["k1", "k2", "k3"]);
    assert_ids(detail.tags(), &["t3", "t1", "t2"]);
    assert_eq!(detail.occurrences().len(), 1);

    let calls = catalog.calls();
    assert_eq!(calls[0], ApiCall::Get(Resource::Categorias, id("c1")));
    let ranked = calls.iter().find_map(|call| match call {
        ApiCall::List(Resource::Clasificaciones, query) => Some(query.clone()),
        _ => None,
    });
    let ranked = ranked.expect("classifications were not listed");
    assert_eq!(ranked.direccion, SortDirection::Desc);
    assert_eq!(ranked.columna, RATING_COLUMN);
    assert_eq!(ranked.activo, ActiveFilter::Active);
    // One batched occurrence query for the whole category.
    let occurrence_queries = calls
        .iter()
        .filter(|call| matches!(call, ApiCall::ListOccurrences(q) if q.categoria_id == id("c1")))
        .count();
    assert_eq!(occurrence_queries, 1);
}

#[tokio::test]
async fn occurrences_group_by_classification() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();

    assert_eq!(descriptions(detail.occurrences_for(&id("k1"))), vec!["Dulce"]);
    assert!(detail.occurrences_for(&id("k2")).is_empty());
}

#[tokio::test]
async fn failed_reload_keeps_shown_detail() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();

    catalog.fail_with(503, "Servicio no disponible");
    let result = detail.load(&id("c1"), &catalog, &port).await;

    assert!(matches!(result, Err(ControllerError::Api(_))));
    assert_eq!(detail.category().unwrap().id, id("c1"));
    assert_ids(detail.classifications(), &["k1", "k2", "k3"]);
    assert_eq!(port.errors(), vec!["Servicio no disponible".to_string()]);
}

#[tokio::test]
async fn failed_switch_clears_previous_category() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();
    let sabor = detail.classifications()[0].clone();
    detail.open_relation_dialog(Some(sabor));

    catalog.fail_with(503, "Servicio no disponible");
    let result = detail.load(&id("c2"), &catalog, &port).await;
    catalog.recover();

    assert!(matches!(result, Err(ControllerError::Api(_))));
    assert!(detail.category().is_none());
    assert!(detail.classifications().is_empty());
    assert!(detail.occurrences().is_empty());
    assert!(detail.tags().is_empty());
    assert_eq!(detail.dialog(), &RelationDialog::Closed);

    // Nothing is left to relate a tag to.
    detail.open_relation_dialog(Some(CatalogItem::new("k1", "Sabor")));
    let tag = CatalogItem::new("t1", "Dulce");
    let added = detail.add_occurrence(&tag, &catalog, &port).await;
    assert!(matches!(added, Err(ControllerError::NotLoaded)));
    assert_no_writes(&catalog);
}

#[tokio::test]
async fn partially_populated_tags_resolve_from_cache() {
    let mut partial = occurrence("o3", "t2", "c1", "k3");
    partial.etiqueta = ItemRef::Partial(PartialItem {
        id: id("t2"),
        descripcion: None,
    });
    let catalog = tagging_catalog().with_occurrences(vec![partial]);
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);

    detail.load(&id("c1"), &catalog, &port).await.unwrap();

    assert_eq!(descriptions(detail.occurrences_for(&id("k3"))), vec!["Ácido"]);
}

#[tokio::test]
async fn unknown_category_is_reported() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);

    let result = detail.load(&id("missing"), &catalog, &port).await;

    assert!(result.is_err());
    assert!(detail.category().is_none());
    assert_eq!(port.errors().len(), 1);
}

#[tokio::test]
async fn add_occurrence_without_classification_makes_no_call() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();
    detail.open_relation_dialog(None);
    let tag = detail.tags()[0].clone();

    let result = detail.add_occurrence(&tag, &catalog, &port).await;

    assert!(matches!(result, Err(ControllerError::NoClassificationSelected)));
    assert_no_writes(&catalog);
    assert_eq!(port.infos(), vec!["Please select a classification first".to_string()]);
    assert_eq!(detail.dialog(), &RelationDialog::SelectingClassification);
}

#[tokio::test]
async fn add_occurrence_through_both_steps() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();

    detail.open_relation_dialog(None);
    let textura = detail.classifications()[1].clone();
    assert!(detail.pick_classification(textura));
    detail.set_tag_filter("CRU");
    let choices: Vec<CatalogItem> = detail.tag_choices().into_iter().cloned().collect();
    assert_ids(&choices, &["t3"]);

    let created = detail.add_occurrence(&choices[0], &catalog, &port).await.unwrap();

    assert_eq!(created.tag_id(), &id("t3"));
    assert_eq!(detail.dialog(), &RelationDialog::Closed);
    assert_eq!(port.successes(), vec!["Tag added".to_string()]);
    assert_eq!(descriptions(detail.occurrences_for(&id("k2"))), vec!["Crujiente"]);
    assert_eq!(detail.occurrences().len(), 2);

    let submitted = catalog.calls().into_iter().find_map(|call| match call {
        ApiCall::CreateOccurrence(body) => Some(body),
        _ => None,
    });
    let body = submitted.expect("occurrence was not submitted");
    assert_eq!(body.categoria_id, id("c1"));
    assert_eq!(body.clasificacion_id, id("k2"));
    assert_eq!(body.etiqueta_id, id("t3"));
    assert_eq!(body.creator_user_id, USER_ID);
}

#[tokio::test]
async fn failed_add_keeps_dialog_open() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();
    let sabor = detail.classifications()[0].clone();
    detail.open_relation_dialog(Some(sabor));
    let tag = detail.tags()[0].clone();

    catalog.fail_with(409, "La etiqueta ya fue agregada");
    let result = detail.add_occurrence(&tag, &catalog, &port).await;

    assert!(matches!(result, Err(ControllerError::Api(_))));
    assert!(detail.dialog().is_open());
    assert_eq!(port.errors(), vec!["La etiqueta ya fue agregada".to_string()]);
    assert!(port.successes().is_empty());
}

#[tokio::test]
async fn failed_reload_after_add_still_closes_dialog() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();
    let textura = detail.classifications()[1].clone();
    detail.open_relation_dialog(Some(textura));
    let crujiente = CatalogItem::new("t3", "Crujiente");

    catalog.fail_reads_with(503, "Servicio no disponible");
    let created = detail.add_occurrence(&crujiente, &catalog, &port).await.unwrap();

    assert_eq!(created.tag_id(), &id("t3"));
    assert_eq!(catalog.write_count(), 1);
    assert_eq!(detail.dialog(), &RelationDialog::Closed);
    assert_eq!(port.successes(), vec!["Tag added".to_string()]);
    assert_eq!(port.errors(), vec!["Servicio no disponible".to_string()]);
    // The stale cache stays until the next successful reload.
    assert_eq!(detail.occurrences().len(), 1);
}

#[tokio::test]
async fn dialog_never_returns_to_classification_step() {
    let catalog = tagging_catalog();
    let port = RecordingPort::accepting();
    let mut detail = DetailController::new(USER_ID);
    detail.load(&id("c1"), &catalog, &port).await.unwrap();
    let sabor = detail.classifications()[0].clone();
    let aroma = detail.classifications()[2].clone();

    detail.open_relation_dialog(Some(sabor.clone()));
    assert!(!detail.pick_classification(aroma));
    assert_eq!(detail.selected_classification(), Some(&sabor));

    detail.close_relation_dialog();
    assert_eq!(detail.dialog(), &RelationDialog::Closed);
}
