#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use huma_api::config::ServerConfig;
use huma_api::router::build_app_router;
use huma_api::state::AppState;
use huma_assistant::{AssistantError, ChatModel, ReplyStream};
use huma_core::chat::ChatTurn;
use huma_core::contact::DEFAULT_CONTACT_PHONE;
use huma_core::row::{ProjectRow, ProjectRowPayload};
use huma_core::types::ProjectId;
use huma_db::{ObjectStorage, ProjectTable, TransportError};

/// Public URL prefix handed out by [`FakeStorage`].
pub const PUBLIC_PREFIX: &str = "https://storage.test/object/public/images/";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        refresh_interval_secs: 0,
        draft_idle_secs: 3600,
        contact_phone: DEFAULT_CONTACT_PHONE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// A row as the hosted table would return it.
pub fn row(id: i64, name: &str, lat: f64, lng: f64) -> ProjectRow {
    ProjectRow {
        id: Some(json!(id)),
        created_at: Some(json!(format!("2024-05-{:02}T10:00:00Z", id.clamp(1, 28)))),
        nombre: Some(json!(name)),
        map_description: Some(json!(format!("Resumen de {name}"))),
        descripcion: Some(json!(format!("Detalles de {name}"))),
        coordinates: Some(json!([lat, lng])),
        media: Some(json!([
            { "type": "image", "src": format!("https://cdn.test/{id}-a.jpg"), "alt": "Frente" },
            { "type": "image", "src": format!("https://cdn.test/{id}-b.jpg"), "alt": "Lote" },
        ])),
    }
}

/// In-memory `Proyectos` table.
#[derive(Default)]
pub struct FakeTable {
    pub rows: Mutex<Vec<ProjectRow>>,
    pub failing: AtomicBool,
    pub selects: AtomicUsize,
    pub inserts: Mutex<Vec<ProjectRowPayload>>,
    pub updates: Mutex<Vec<(ProjectId, ProjectRowPayload)>>,
    /// How long each insert takes before it lands.
    pub insert_delay: Mutex<Duration>,
}

impl FakeTable {
    pub fn with_rows(rows: Vec<ProjectRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_rows(&self, rows: Vec<ProjectRow>) {
        *self.rows.lock().unwrap() = rows;
    }

    fn check(&self) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(TransportError::Api {
                status: 503,
                body: "table offline".into(),
            })
        } else {
            Ok(())
        }
    }

    fn payload_row(id: ProjectId, payload: &ProjectRowPayload) -> ProjectRow {
        let mut value = serde_json::to_value(payload).unwrap();
        value["id"] = json!(id);
        serde_json::from_value(value).unwrap()
    }
}

#[async_trait]
impl ProjectTable for FakeTable {
    async fn select_all(&self) -> Result<Vec<ProjectRow>, TransportError> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert(&self, payload: &ProjectRowPayload) -> Result<(), TransportError> {
        let delay = *self.insert_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check()?;
        let mut inserts = self.inserts.lock().unwrap();
        inserts.push(payload.clone());
        let id = format!("new-{}", inserts.len());
        self.rows
            .lock()
            .unwrap()
            .insert(0, Self::payload_row(id, payload));
        Ok(())
    }

    async fn update(&self, id: &ProjectId, payload: &ProjectRowPayload) -> Result<(), TransportError> {
        self.check()?;
        self.updates
            .lock()
            .unwrap()
            .push((id.clone(), payload.clone()));
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.id_string().as_deref() == Some(id)) {
            *row = Self::payload_row(id.clone(), payload);
        }
        Ok(())
    }
}

/// One recorded upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub path: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// In-memory media bucket.
#[derive(Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<Upload>>,
    /// Uploads whose path contains this text fail.
    pub fail_on: Mutex<Option<String>>,
}

impl FakeStorage {
    pub fn fail_on(&self, needle: &str) {
        *self.fail_on.lock().unwrap() = Some(needle.to_string());
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, path: &str, content_type: &str, bytes: Bytes) -> Result<(), TransportError> {
        if let Some(needle) = self.fail_on.lock().unwrap().as_deref() {
            if path.contains(needle) {
                return Err(TransportError::Api {
                    status: 409,
                    body: "The resource already exists".into(),
                });
            }
        }
        self.uploads.lock().unwrap().push(Upload {
            path: path.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{PUBLIC_PREFIX}{path}")
    }
}

/// Scripted chat model.
#[derive(Default)]
pub struct FakeChat {
    pub fragments: Vec<String>,
    /// Fail the stream after the scripted fragments.
    pub break_stream: bool,
    pub suggestion: String,
    pub system_instructions: Mutex<Vec<String>>,
    pub messages: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeChat {
    pub fn replying(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn suggesting(text: &str) -> Self {
        Self {
            suggestion: text.to_string(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn stream_reply(
        &self,
        system_instruction: &str,
        _history: &[ChatTurn],
        message: &str,
    ) -> Result<ReplyStream, AssistantError> {
        self.system_instructions
            .lock()
            .unwrap()
            .push(system_instruction.to_string());
        self.messages.lock().unwrap().push(message.to_string());

        let mut items: Vec<Result<String, AssistantError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        if self.break_stream {
            items.push(Err(AssistantError::InvalidResponse("connection reset".into())));
        }
        Ok(stream::iter(items).boxed())
    }

    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.suggestion.clone())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The router plus handles on its collaborators.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub table: Arc<FakeTable>,
    pub storage: Arc<FakeStorage>,
    pub chat: Option<Arc<FakeChat>>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over fakes and run the startup refresh.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack production uses.
pub async fn build_test_app(table: FakeTable, chat: Option<FakeChat>) -> TestApp {
    build_test_app_with(test_config(), table, chat).await
}

/// [`build_test_app`] with a custom configuration.
pub async fn build_test_app_with(
    config: ServerConfig,
    table: FakeTable,
    chat: Option<FakeChat>,
) -> TestApp {
    let table = Arc::new(table);
    let storage = Arc::new(FakeStorage::default());
    let chat = chat.map(Arc::new);

    let state = AppState::new(
        config.clone(),
        table.clone(),
        storage.clone(),
        chat.clone().map(|c| c as Arc<dyn ChatModel>),
    );
    state.store.refresh().await;

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        table,
        storage,
        chat,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    json_request(app, Method::PUT, uri, body).await
}

async fn json_request(app: Router, method: Method, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

const BOUNDARY: &str = "huma-test-boundary";

/// One part of a multipart body.
pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File { file_name: &'a str, content_type: &'a str, bytes: &'a [u8] },
}

/// POST a `multipart/form-data` body.
pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Split an SSE body into `(event, data)` pairs.
pub fn sse_events(body: &str) -> Vec<(String, String)> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = Vec::new();
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event:") {
                    event = Some(name.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
                }
            }
            event.map(|e| (e, data.join("\n")))
        })
        .collect()
}
