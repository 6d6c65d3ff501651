//! API client layer for the catalog REST endpoints.

use crate::config::{SessionConfig, TuiConfig};
use async_trait::async_trait;
use catalogo_core::{
    CatalogItem, CreateItemRequest, CreateOccurrenceRequest, ItemId, ListPage, ListQuery,
    OccurrenceQuery, Resource, TagOccurrence, UpdateItemRequest,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const OCCURRENCES_PATH: &str = "etiquetas-aparicion";
const OCCURRENCE_LIST_KEY: &str = "etiquetasAparicion";
const OCCURRENCE_ITEM_KEY: &str = "etiquetaAparicion";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The request never produced an HTTP response (connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status; `message` is its own wording.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ApiClientError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiClientError::Network(_))
    }
}

/// Operations the controllers need from the backend.
///
/// `RestClient` is the production implementation; tests substitute an
/// in-memory catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_items(&self, resource: Resource, query: &ListQuery) -> Result<ListPage, ApiClientError>;

    async fn get_item(&self, resource: Resource, id: &ItemId) -> Result<CatalogItem, ApiClientError>;

    async fn create_item(
        &self,
        resource: Resource,
        body: &CreateItemRequest,
    ) -> Result<CatalogItem, ApiClientError>;

    async fn update_item(
        &self,
        resource: Resource,
        id: &ItemId,
        body: &UpdateItemRequest,
    ) -> Result<CatalogItem, ApiClientError>;

    async fn list_occurrences(&self, query: &OccurrenceQuery) -> Result<Vec<TagOccurrence>, ApiClientError>;

    async fn create_occurrence(
        &self,
        body: &CreateOccurrenceRequest,
    ) -> Result<TagOccurrence, ApiClientError>;
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_session(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
            &config.session,
        )
    }

    pub fn with_session(
        base_url: &str,
        timeout: Duration,
        session: &SessionConfig,
    ) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let auth_header = build_auth_headers(session)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<Q>(&self, path: &str, query: Option<&Q>) -> Result<serde_json::Value, ApiClientError>
    where
        Q: serde::Serialize + ?Sized,
    {
        let mut request = self.client.get(self.url(path)).headers(self.auth_header.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;
        self.parse_response(response).await
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> Result<serde_json::Value, ApiClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.url(path))
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn patch_json<B>(&self, path: &str, body: &B) -> Result<serde_json::Value, ApiClientError>
    where
        B: serde::Serialize + ?Sized,
    {
        let response = self
            .client
            .patch(self.url(path))
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<serde_json::Value, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }
        Err(api_error(status.as_u16(), &text))
    }
}

#[async_trait]
impl CatalogApi for RestClient {
    async fn list_items(&self, resource: Resource, query: &ListQuery) -> Result<ListPage, ApiClientError> {
        tracing::debug!(%resource, page = query.pagina, "Listing catalog items");
        let body = self.get_json(resource.path(), Some(query)).await?;
        decode_list_page(resource, body)
    }

    async fn get_item(&self, resource: Resource, id: &ItemId) -> Result<CatalogItem, ApiClientError> {
        let path = format!("{}/{}", resource.path(), id);
        let body = self.get_json::<()>(&path, None).await?;
        take_field(body, &[resource.item_key(), "item"])
    }

    async fn create_item(
        &self,
        resource: Resource,
        body: &CreateItemRequest,
    ) -> Result<CatalogItem, ApiClientError> {
        let response = self.post_json(resource.path(), body).await?;
        take_field(response, &[resource.item_key(), "item"])
    }

    async fn update_item(
        &self,
        resource: Resource,
        id: &ItemId,
        body: &UpdateItemRequest,
    ) -> Result<CatalogItem, ApiClientError> {
        let path = format!("{}/{}", resource.path(), id);
        let response = self.patch_json(&path, body).await?;
        take_field(response, &[resource.item_key(), "item"])
    }

    async fn list_occurrences(&self, query: &OccurrenceQuery) -> Result<Vec<TagOccurrence>, ApiClientError> {
        let body = self.get_json(OCCURRENCES_PATH, Some(query)).await?;
        take_field(body, &[OCCURRENCE_LIST_KEY, "items"])
    }

    async fn create_occurrence(
        &self,
        body: &CreateOccurrenceRequest,
    ) -> Result<TagOccurrence, ApiClientError> {
        let response = self.post_json(OCCURRENCES_PATH, body).await?;
        take_field(response, &[OCCURRENCE_ITEM_KEY, "item"])
    }
}

/// Error body shapes the API is known to send.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

fn api_error(status: u16, text: &str) -> ApiClientError {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => {
            if let Some(code) = body.code {
                tracing::debug!(status, %code, "API reported error");
            }
            ApiClientError::Api {
                status,
                message: body.message,
            }
        }
        Err(_) => ApiClientError::Api {
            status,
            message: format!("HTTP {}: {}", status, text),
        },
    }
}

/// Decode a `{ <listKey>: [...], totalItems }` envelope.
pub fn decode_list_page(resource: Resource, mut body: serde_json::Value) -> Result<ListPage, ApiClientError> {
    let total = body.get("totalItems").and_then(serde_json::Value::as_u64);
    let items: Vec<CatalogItem> = take_field_mut(&mut body, &[resource.list_key(), "items"])?;
    let total_items = total.unwrap_or(items.len() as u64);
    Ok(ListPage { items, total_items })
}

fn take_field<T: DeserializeOwned>(mut body: serde_json::Value, keys: &[&str]) -> Result<T, ApiClientError> {
    take_field_mut(&mut body, keys)
}

fn take_field_mut<T: DeserializeOwned>(body: &mut serde_json::Value, keys: &[&str]) -> Result<T, ApiClientError> {
    let object = body
        .as_object_mut()
        .ok_or_else(|| ApiClientError::InvalidResponse("expected a JSON object".to_string()))?;
    for key in keys {
        if let Some(value) = object.remove(*key) {
            return Ok(serde_json::from_value(value)?);
        }
    }
    Err(ApiClientError::InvalidResponse(format!(
        "missing field, expected one of {:?}",
        keys
    )))
}

fn build_auth_headers(session: &SessionConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    let value = format!("Bearer {}", session.token);
    headers.insert(
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_page_uses_resource_key() {
        let body = json!({
            "unidadesMedida": [{ "id": "u1", "descripcion": "Kilo", "activo": true }],
            "totalItems": 12
        });
        let page = decode_list_page(Resource::UnidadesMedida, body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_items, 12);
    }

    #[test]
    fn test_decode_list_page_falls_back_to_items() {
        let body = json!({ "items": [], "totalItems": 0 });
        let page = decode_list_page(Resource::Etiquetas, body).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_decode_list_page_rejects_missing_key() {
        let body = json!({ "totalItems": 3 });
        let err = decode_list_page(Resource::Categorias, body).unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_api_error_message_is_verbatim() {
        let err = api_error(409, r#"{"message":"La categoría ya existe"}"#);
        assert_eq!(err.to_string(), "La categoría ya existe");
        assert!(!err.is_network());
    }

    #[test]
    fn test_api_error_without_body() {
        let err = api_error(502, "Bad Gateway");
        assert!(matches!(err, ApiClientError::Api { status: 502, .. }));
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_auth_header_is_bearer() {
        let session = SessionConfig {
            token: "abc".to_string(),
            user_id: "u1".to_string(),
            permissions: Vec::new(),
        };
        let headers = build_auth_headers(&session).unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Bearer abc");
    }
}
