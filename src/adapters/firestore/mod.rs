pub mod value;

use crate::config::toml_config::FirebaseConfig;
use crate::domain::model::DrawRecord;
use crate::domain::ports::{CollectionQuery, Direction, DocumentStore};
use crate::utils::error::{Result, ResultsError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use url::Url;

/// Firestore REST (v1) 文件庫的讀取端
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest<'a> {
    structured_query: StructuredQuery<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredQuery<'a> {
    from: Vec<CollectionSelector<'a>>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<Order<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector<'a> {
    collection_id: &'a str,
}

#[derive(Serialize)]
struct Order<'a> {
    field: FieldReference<'a>,
    direction: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference<'a> {
    field_path: &'a str,
}

#[derive(Deserialize)]
struct RunQueryResponseItem {
    document: Option<RawDocument>,
}

#[derive(Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RawDocument {
    fn into_record(self) -> Result<DrawRecord> {
        let data = value::decode_fields(&self.fields)?;
        Ok(DrawRecord::new(value::document_id(&self.name), data))
    }
}

impl<'a> From<&'a CollectionQuery> for RunQueryRequest<'a> {
    fn from(query: &'a CollectionQuery) -> Self {
        let order_by = query
            .order_by
            .iter()
            .map(|(field_path, direction)| Order {
                field: FieldReference { field_path },
                direction: match direction {
                    Direction::Ascending => "ASCENDING",
                    Direction::Descending => "DESCENDING",
                },
            })
            .collect();

        let mut field_filters: Vec<Value> = query
            .filters
            .iter()
            .map(|(field_path, expected)| {
                json!({
                    "fieldFilter": {
                        "field": { "fieldPath": field_path },
                        "op": "EQUAL",
                        "value": value::encode_value(expected),
                    }
                })
            })
            .collect();
        let filter = match field_filters.len() {
            0 => None,
            1 => field_filters.pop(),
            _ => Some(json!({
                "compositeFilter": { "op": "AND", "filters": field_filters }
            })),
        };

        RunQueryRequest {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: &query.collection,
                }],
                filter,
                order_by,
                limit: query.limit,
            },
        }
    }
}

impl FirestoreStore {
    /// 建立連線物件不會失敗；設定錯誤會在第一次查詢時才出現
    pub fn new(config: &FirebaseConfig) -> Self {
        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.project_id,
            config.database
        );
        tracing::debug!("Firestore documents root: {}", documents_url);

        Self {
            client: Client::new(),
            documents_url,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.documents_url).map_err(|e| {
            ResultsError::InvalidConfigValueError {
                field: "firebase.endpoint".to_string(),
                value: self.documents_url.clone(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;
        url.path_segments_mut()
            .map_err(|_| ResultsError::InvalidConfigValueError {
                field: "firebase.endpoint".to_string(),
                value: self.documents_url.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .push(collection)
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn run_query(&self, query: &CollectionQuery) -> Result<Vec<DrawRecord>> {
        let url = format!("{}:runQuery", self.documents_url);
        let body = RunQueryRequest::from(query);

        tracing::debug!("Running query on '{}' via {}", query.collection, url);
        let response = self.with_key(self.client.post(&url)).json(&body).send().await?;
        tracing::debug!("Firestore response status: {}", response.status());

        let response = ensure_success(response).await?;
        let items: Vec<RunQueryResponseItem> = response.json().await?;

        let records = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(RawDocument::into_record)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Query on '{}' returned {} documents", query.collection, records.len());
        Ok(records)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<DrawRecord>> {
        let url = self.document_url(collection, id)?;

        tracing::debug!("Fetching document {}", url);
        let response = self.with_key(self.client.get(url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Document '{}/{}' not found", collection, id);
            return Ok(None);
        }

        let response = ensure_success(response).await?;
        let document: RawDocument = response.json().await?;
        document.into_record().map(Some)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ResultsError::StoreError {
        status: status.as_u16(),
        message: error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        }),
    })
}

// 錯誤可能是 {"error": {...}}，runQuery 則包在陣列裡
fn error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let error = match &parsed {
        Value::Array(items) => items.iter().find_map(|item| item.get("error"))?,
        other => other.get("error")?,
    };
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
