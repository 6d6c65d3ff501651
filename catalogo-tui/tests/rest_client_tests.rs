//! Wire contract of `RestClient` against a local HTTP server.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use catalogo_core::{
    ActiveFilter, CreateItemRequest, CreateOccurrenceRequest, ItemId, ItemRef, ListQuery,
    OccurrenceQuery, Resource, SortDirection, UpdateItemRequest,
};
use catalogo_tui::api_client::{ApiClientError, CatalogApi, RestClient};
use catalogo_tui::config::SessionConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    authorization: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

async fn handle(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query,
        authorization,
        body: body.clone(),
    });

    match (method, path.as_str()) {
        (Method::GET, "/api/categorias") => Json(json!({
            "categorias": [
                { "_id": "c1", "descripcion": "Frutas", "activo": true, "createdAt": "2024-03-01T10:00:00.000Z" },
                { "_id": "c2", "descripcion": "Verduras" }
            ],
            "totalItems": 7
        }))
        .into_response(),
        (Method::GET, "/api/unidades-medida") => Json(json!({
            "unidadesMedida": [{ "id": 3, "descripcion": "Kilo", "activo": false }],
            "totalItems": 1
        }))
        .into_response(),
        (Method::GET, "/api/categorias/c1") => Json(json!({
            "categoria": { "_id": "c1", "descripcion": "Frutas", "activo": true }
        }))
        .into_response(),
        (Method::POST, "/api/categorias") => (
            StatusCode::CREATED,
            Json(json!({ "categoria": { "_id": "c9", "descripcion": "Granos", "activo": true } })),
        )
            .into_response(),
        (Method::POST, "/api/etiquetas") => (
            StatusCode::CONFLICT,
            Json(json!({ "code": "DUPLICATE", "message": "La etiqueta ya existe" })),
        )
            .into_response(),
        (Method::PATCH, "/api/etiquetas/t1") => Json(json!({
            "etiqueta": { "_id": "t1", "descripcion": "Dulce", "activo": false }
        }))
        .into_response(),
        (Method::GET, "/api/clasificaciones") => {
            (StatusCode::BAD_GATEWAY, "upstream down").into_response()
        }
        (Method::GET, "/api/etiquetas-aparicion") => Json(json!({
            "etiquetasAparicion": [{
                "_id": "o1",
                "etiqueta": { "_id": "t1", "descripcion": "Dulce" },
                "categoriaId": "c1",
                "clasificacionId": "k1",
                "createdAt": "2024-03-02T09:30:00.000Z"
            }]
        }))
        .into_response(),
        (Method::POST, "/api/etiquetas-aparicion") => Json(json!({
            "etiquetaAparicion": {
                "_id": "o2",
                "etiqueta": "t3",
                "categoriaId": "c1",
                "clasificacionId": "k2"
            }
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Ruta inexistente" }))).into_response(),
    }
}

async fn serve() -> (String, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(handle).with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api/", addr), log)
}

fn client(base_url: &str) -> RestClient {
    let session = SessionConfig {
        token: "secret-token".to_string(),
        user_id: "user-1".to_string(),
        permissions: vec!["CATEGORIAS_ALL".to_string()],
    };
    RestClient::with_session(base_url, Duration::from_secs(5), &session).unwrap()
}

fn last(log: &Log) -> Recorded {
    log.lock().unwrap().last().cloned().expect("no request reached the server")
}

#[tokio::test]
async fn list_sends_query_and_bearer_token() {
    let (base_url, log) = serve().await;
    let api = client(&base_url);
    let query = ListQuery {
        direccion: SortDirection::Desc,
        parametro: "fru".to_string(),
        pagina: 2,
        items_por_pagina: 10,
        activo: ActiveFilter::Active,
        ..ListQuery::default()
    };

    let page = api.list_items(Resource::Categorias, &query).await.unwrap();

    assert_eq!(page.total_items, 7);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, ItemId::new("c1"));
    assert!(page.items[0].created_at.is_some());
    assert!(page.items[1].activo);

    let request = last(&log);
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/api/categorias");
    assert_eq!(request.authorization.as_deref(), Some("Bearer secret-token"));
    assert_eq!(request.query["direccion"], "desc");
    assert_eq!(request.query["columna"], "descripcion");
    assert_eq!(request.query["parametro"], "fru");
    assert_eq!(request.query["pagina"], "2");
    assert_eq!(request.query["itemsPorPagina"], "10");
    assert_eq!(request.query["activo"], "true");
}

#[tokio::test]
async fn unfiltered_list_sends_empty_activo() {
    let (base_url, log) = serve().await;
    let api = client(&base_url);

    let page = api
        .list_items(Resource::UnidadesMedida, &ListQuery::default())
        .await
        .unwrap();

    assert_eq!(page.items[0].id, ItemId::new("3"));
    assert!(!page.items[0].activo);
    let request = last(&log);
    assert_eq!(request.path, "/api/unidades-medida");
    assert_eq!(request.query.get("activo").map(String::as_str), Some(""));
    assert_eq!(request.query["itemsPorPagina"], "1000000");
}

#[tokio::test]
async fn get_and_create_unwrap_item_envelope() {
    let (base_url, log) = serve().await;
    let api = client(&base_url);

    let item = api.get_item(Resource::Categorias, &ItemId::new("c1")).await.unwrap();
    assert_eq!(item.descripcion, "Frutas");
    assert_eq!(last(&log).path, "/api/categorias/c1");

    let body = CreateItemRequest {
        descripcion: "Granos".to_string(),
        creator_user_id: "user-1".to_string(),
    };
    let created = api.create_item(Resource::Categorias, &body).await.unwrap();
    assert_eq!(created.id, ItemId::new("c9"));

    let request = last(&log);
    assert_eq!(request.method, Method::POST);
    let sent: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent, json!({ "descripcion": "Granos", "creatorUserId": "user-1" }));
}

#[tokio::test]
async fn update_patches_only_given_fields() {
    let (base_url, log) = serve().await;
    let api = client(&base_url);

    let updated = api
        .update_item(Resource::Etiquetas, &ItemId::new("t1"), &UpdateItemRequest::activo(false))
        .await
        .unwrap();

    assert!(!updated.activo);
    let request = last(&log);
    assert_eq!(request.method, Method::PATCH);
    let sent: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent, json!({ "activo": false }));
}

#[tokio::test]
async fn server_message_surfaces_verbatim() {
    let (base_url, _log) = serve().await;
    let api = client(&base_url);
    let body = CreateItemRequest {
        descripcion: "Dulce".to_string(),
        creator_user_id: "user-1".to_string(),
    };

    let err = api.create_item(Resource::Etiquetas, &body).await.unwrap_err();

    assert!(matches!(err, ApiClientError::Api { status: 409, .. }));
    assert_eq!(err.to_string(), "La etiqueta ya existe");
}

#[tokio::test]
async fn non_json_error_keeps_status() {
    let (base_url, _log) = serve().await;
    let api = client(&base_url);

    let err = api
        .list_items(Resource::Clasificaciones, &ListQuery::ranked_active())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "HTTP 502: upstream down");
    assert!(!err.is_network());
}

#[tokio::test]
async fn occurrences_round_trip() {
    let (base_url, log) = serve().await;
    let api = client(&base_url);

    let occurrences = api
        .list_occurrences(&OccurrenceQuery::for_category(ItemId::new("c1")))
        .await
        .unwrap();
    assert_eq!(occurrences.len(), 1);
    assert!(matches!(&occurrences[0].etiqueta, ItemRef::Item(tag) if tag.descripcion == "Dulce"));
    assert_eq!(occurrences[0].classification_id(), &ItemId::new("k1"));

    let request = last(&log);
    assert_eq!(request.query["categoriaId"], "c1");
    assert_eq!(request.query["direccion"], "desc");
    assert_eq!(request.query["columna"], "createdAt");

    let body = CreateOccurrenceRequest {
        etiqueta_id: ItemId::new("t3"),
        categoria_id: ItemId::new("c1"),
        clasificacion_id: ItemId::new("k2"),
        creator_user_id: "user-1".to_string(),
    };
    let created = api.create_occurrence(&body).await.unwrap();
    assert_eq!(created.tag_id(), &ItemId::new("t3"));

    let sent: Value = serde_json::from_str(&last(&log).body).unwrap();
    assert_eq!(
        sent,
        json!({
            "etiquetaId": "t3",
            "categoriaId": "c1",
            "clasificacionId": "k2",
            "creatorUserId": "user-1"
        })
    );
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(&format!("http://{}/api", addr));

    let err = api
        .get_item(Resource::Categorias, &ItemId::new("c1"))
        .await
        .unwrap_err();

    assert!(err.is_network());
}
