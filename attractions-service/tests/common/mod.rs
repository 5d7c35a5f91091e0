#![allow(dead_code)]

use async_trait::async_trait;
use attractions_service::config::{AttractionsConfig, CorsConfig, MongoConfig, SearchConfig};
use attractions_service::services::AttractionStore;
use attractions_service::startup::{build_router, AppState, Application};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mongodb::bson::{oid::ObjectId, Bson, Document};
use regex::RegexBuilder;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub fn test_config() -> AttractionsConfig {
    AttractionsConfig {
        common: CoreConfig { port: 0 },
        mongodb: MongoConfig {
            uri: Some("mongodb://localhost:27017".to_string()),
            database: Some("attractions_test".to_string()),
        },
        search: SearchConfig::default(),
        cors: CorsConfig::default(),
    }
}

/// In-process store that understands the filter shapes the query builder
/// emits: `$regex` with `$options`, `$in`, and a top-level `$or`.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Mutex<Vec<(String, Document)>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl AttractionStore for InMemoryStore {
    async fn insert(&self, collection: &str, mut document: Document) -> Result<Bson, AppError> {
        let id = Bson::ObjectId(ObjectId::new());
        document.insert("_id", id.clone());
        self.documents
            .lock()
            .unwrap()
            .push((collection.to_string(), document));
        Ok(id)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, doc)| c == collection && matches(doc, &filter))
            .map(|(_, doc)| doc.clone())
            .take(limit as usize)
            .collect())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        let mut names: Vec<String> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .map(|(c, _)| c.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, cond)| match key.as_str() {
        "$or" => cond
            .as_array()
            .map(|arms| {
                arms.iter()
                    .filter_map(Bson::as_document)
                    .any(|arm| matches(doc, arm))
            })
            .unwrap_or(false),
        field => field_matches(doc.get(field), cond),
    })
}

fn field_matches(value: Option<&Bson>, cond: &Bson) -> bool {
    let Some(cond) = cond.as_document() else {
        return value == Some(cond);
    };

    if let Ok(pattern) = cond.get_str("$regex") {
        let insensitive = cond
            .get_str("$options")
            .map(|o| o.contains('i'))
            .unwrap_or(false);
        let re = RegexBuilder::new(pattern)
            .case_insensitive(insensitive)
            .build()
            .expect("query builder produced an invalid pattern");
        return match value {
            Some(Bson::String(s)) => re.is_match(s),
            Some(Bson::Array(items)) => items
                .iter()
                .filter_map(Bson::as_str)
                .any(|s| re.is_match(s)),
            _ => false,
        };
    }

    if let Ok(candidates) = cond.get_array("$in") {
        return match value {
            Some(Bson::Array(items)) => items.iter().any(|item| candidates.contains(item)),
            Some(other) => candidates.contains(other),
            None => false,
        };
    }

    false
}

/// Every call fails the way an unreachable server would.
pub struct FailingStore;

#[async_trait]
impl AttractionStore for FailingStore {
    async fn insert(&self, _collection: &str, _document: Document) -> Result<Bson, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!(
            "Server selection timeout: No available servers"
        )))
    }

    async fn find(
        &self,
        _collection: &str,
        _filter: Document,
        _limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!(
            "Server selection timeout: No available servers"
        )))
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!(
            "Server selection timeout: No available servers. Topology: Unknown, servers: localhost:27017"
        )))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!(
            "Server selection timeout: No available servers"
        )))
    }
}

/// Panics while enumerating collections.
pub struct PanickingStore;

#[async_trait]
impl AttractionStore for PanickingStore {
    async fn insert(&self, _collection: &str, _document: Document) -> Result<Bson, AppError> {
        Ok(Bson::ObjectId(ObjectId::new()))
    }

    async fn find(
        &self,
        _collection: &str,
        _filter: Document,
        _limit: i64,
    ) -> Result<Vec<Document>, AppError> {
        Ok(Vec::new())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, AppError> {
        panic!("driver state corrupted")
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn router_with(config: AttractionsConfig, store: Option<Arc<dyn AttractionStore>>) -> Router {
    build_router(AppState::new(config, store))
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router failed to respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawns the real server on a random port around `store`.
    pub async fn spawn(store: Option<Arc<dyn AttractionStore>>) -> Self {
        let mut config = test_config();
        if store.is_none() {
            config.mongodb = MongoConfig::default();
        }

        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling the root endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
