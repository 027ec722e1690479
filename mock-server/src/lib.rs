//! Mock AIL instance used by the core crate's integration tests.
//!
//! Implements the subset of the AIL REST API the client exercises: ping,
//! JSON item import, and crawler task/capture submission. Every route
//! requires the [`API_KEY`] in the `Authorization` header. Import validates
//! that `data` is a base64-encoded gzip stream and that `data-sha256`
//! matches the decompressed bytes, so transport-encoding bugs in the client
//! fail loudly. Successful submissions reply with the `response` envelope
//! the real service uses.

use std::io::Read;
use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// The only key the mock accepts.
pub const API_KEY: &str = "ail-mock-key";

#[derive(Debug, Default)]
pub struct MockState {
    /// Imported items by source uuid: decompressed item text.
    pub items: HashMap<Uuid, String>,
    /// Crawl tasks by generated task uuid: target URL.
    pub tasks: HashMap<Uuid, String>,
}

pub type Db = Arc<RwLock<MockState>>;

#[derive(Deserialize)]
pub struct ImportItem {
    pub data: String,
    #[serde(rename = "data-sha256")]
    pub data_sha256: String,
    #[serde(default)]
    pub meta: Value,
    pub source: String,
    pub source_uuid: Uuid,
    pub default_encoding: String,
}

#[derive(Deserialize)]
pub struct CrawlerTask {
    pub url: String,
    #[serde(default)]
    pub har: bool,
    #[serde(default)]
    pub screenshot: bool,
    #[serde(default = "default_depth")]
    pub depth_limit: u32,
    pub cookiejar: Option<String>,
    pub proxy: Option<String>,
    pub frequency: Option<Value>,
}

#[derive(Deserialize)]
pub struct CrawlerCapture {
    pub task_uuid: Uuid,
    pub capture_uuid: Uuid,
    pub url: String,
    #[serde(default)]
    pub har: bool,
    #[serde(default)]
    pub screenshot: bool,
    #[serde(default = "default_depth")]
    pub depth_limit: u32,
    pub proxy: Option<String>,
}

fn default_depth() -> u32 {
    1
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(MockState::default()));
    Router::new()
        .route("/api/v1/ping", get(ping))
        .route("/api/v1/import/json/item", post(import_item))
        .route("/api/v1/add/crawler/task", post(add_crawler_task))
        .route("/api/v1/add/crawler/capture", post(add_crawler_capture))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type ApiError = (StatusCode, Json<Value>);

fn authorize(headers: &HeaderMap) -> Result<(), ApiError> {
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(key) if key == API_KEY => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "reason": "Authentication failed"})),
        )),
    }
}

fn bad_request(reason: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": "error", "reason": reason})),
    )
}

async fn ping(headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    Ok(Json(json!({"status": "pong"})))
}

async fn import_item(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(item): Json<ImportItem>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;

    let compressed = BASE64
        .decode(&item.data)
        .map_err(|_| bad_request("Invalid base64 data"))?;
    let mut decoder = flate2::read::GzDecoder::new(compressed.as_slice());
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|_| bad_request("Invalid gzip stream"))?;

    let digest = format!("{:x}", Sha256::digest(&decompressed));
    if digest != item.data_sha256 {
        return Err(bad_request("Invalid data-sha256"));
    }

    let text = String::from_utf8(decompressed)
        .map_err(|_| bad_request("Item data is not valid UTF-8"))?;
    db.write().await.items.insert(item.source_uuid, text);

    Ok(Json(json!({"response": {"uuid": Uuid::new_v4()}})))
}

async fn add_crawler_task(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(task): Json<CrawlerTask>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;

    if task.url.is_empty() {
        return Err(bad_request("No url supplied"));
    }

    let task_uuid = Uuid::new_v4();
    db.write().await.tasks.insert(task_uuid, task.url);
    Ok(Json(json!({"response": {"uuid": task_uuid}})))
}

async fn add_crawler_capture(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(capture): Json<CrawlerCapture>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;

    if capture.url.is_empty() {
        return Err(bad_request("No url supplied"));
    }
    let known = db.read().await.tasks.contains_key(&capture.task_uuid);
    if !known {
        return Err(bad_request("Unknown task_uuid"));
    }

    Ok(Json(json!({"response": {"uuid": capture.capture_uuid}})))
}
