// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    routing::post,
    Json, Router,
};
use scene_sniffer::config::{Config, ProviderKind};
use scene_sniffer::error::AppError;
use scene_sniffer::models::{RelayReply, RelayRequest};
use scene_sniffer::overlay::{HostSurface, Notification, Panel, RelayChannel};
use scene_sniffer::page::{PageDocument, StaticPage};
use scene_sniffer::routes::create_router;
use scene_sniffer::store::MemoryStore;
use scene_sniffer::AppState;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// A request received by the fake provider.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    /// `?key=` query parameter (Gemini shape)
    pub key: Option<String>,
    /// `Authorization` header (OpenAI-compatible shape)
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct FakeState {
    /// Responses consumed in order, per model
    queued: Mutex<HashMap<String, VecDeque<(u16, Value)>>>,
    /// Response repeated once the queue is empty, per model
    standing: Mutex<HashMap<String, (u16, Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeState {
    fn reply_for(&self, model: &str) -> (StatusCode, Json<Value>) {
        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(VecDeque::pop_front);
        let (status, body) = queued
            .or_else(|| self.standing.lock().unwrap().get(model).cloned())
            .unwrap_or((404, provider_error(404, &format!("models/{} is not found", model))));
        (StatusCode::from_u16(status).unwrap(), Json(body))
    }
}

/// In-process stand-in for the provider API.
#[derive(Clone)]
pub struct FakeProvider {
    pub base_url: String,
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeProvider {
    /// Answer every request for `model` with `status` and `body`.
    pub fn respond(&self, model: &str, status: u16, body: Value) {
        self.state
            .standing
            .lock()
            .unwrap()
            .insert(model.to_string(), (status, body));
    }

    /// Answer the next request for `model` with `status` and `body`.
    pub fn respond_once(&self, model: &str, status: u16, body: Value) {
        self.state
            .queued
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back((status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, model: &str) -> usize {
        self.requests().iter().filter(|r| r.model == model).count()
    }
}

async fn gemini_generate(
    State(state): State<Arc<FakeState>>,
    Path(target): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let model = target.trim_end_matches(":generateContent").to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        model: model.clone(),
        key: query.get("key").cloned(),
        authorization: None,
        body,
    });
    state.reply_for(&model)
}

async fn chat_completions(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        model: model.clone(),
        key: None,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
        body,
    });
    state.reply_for(&model)
}

/// Start a fake provider on an ephemeral loopback port.
pub async fn spawn_fake_provider() -> FakeProvider {
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route("/models/{target}", post(gemini_generate))
        .route("/chat/completions", post(chat_completions))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeProvider {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// Gemini-shaped success body.
#[allow(dead_code)]
pub fn gemini_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "candidatesTokenCount": 42 }
    })
}

/// OpenAI-shaped success body.
#[allow(dead_code)]
pub fn openai_text(text: &str) -> Value {
    json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "completion_tokens": 42 }
    })
}

#[allow(dead_code)]
pub fn provider_error(code: u16, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}

/// A relay host wired to a fake provider with in-memory storage.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub provider: FakeProvider,
}

#[allow(dead_code)]
impl TestApp {
    pub fn paid_model(&self) -> String {
        self.state.config.paid_model.clone()
    }

    pub fn free_model(&self) -> String {
        self.state.config.free_model.clone()
    }

    /// POST a raw JSON value to `/relay` and decode the reply.
    pub async fn relay_json(&self, message: Value) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/relay")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(message.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

/// Create a test app for `kind` with `config` tweaks applied.
#[allow(dead_code)]
pub async fn create_test_app_with(
    kind: ProviderKind,
    tweak: impl FnOnce(&mut Config),
) -> TestApp {
    let provider = spawn_fake_provider().await;

    let mut config = Config::test_default();
    let (paid, free) = kind.default_models();
    config.provider = kind;
    config.provider_base_url = provider.base_url.clone();
    config.paid_model = paid.to_string();
    config.free_model = free.to_string();
    tweak(&mut config);

    let state = Arc::new(AppState::new(config, Arc::new(MemoryStore::new())).unwrap());
    TestApp {
        router: create_router(state.clone()),
        state,
        provider,
    }
}

/// Create a Gemini-shaped test app.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    create_test_app_with(ProviderKind::Gemini, |_| {}).await
}

#[allow(dead_code)]
#[derive(Default)]
pub struct HostLog {
    pub button: bool,
    pub panels: Vec<Panel>,
    pub cleared: usize,
    pub notifications: Vec<Notification>,
}

/// Host page double: a static document plus a record of what was drawn.
#[allow(dead_code)]
pub struct FakeHost {
    page: Mutex<StaticPage>,
    pub log: Mutex<HostLog>,
}

#[allow(dead_code)]
impl FakeHost {
    pub fn new(page: StaticPage) -> Arc<Self> {
        Arc::new(Self {
            page: Mutex::new(page),
            log: Mutex::new(HostLog::default()),
        })
    }

    /// Client-side navigation.
    pub fn navigate(&self, url: &str) {
        self.page.lock().unwrap().url = url.to_string();
    }

    /// The host re-rendered and dropped our button.
    pub fn drop_button(&self) {
        self.log.lock().unwrap().button = false;
    }

    pub fn last_panel(&self) -> Option<Panel> {
        self.log.lock().unwrap().panels.last().cloned()
    }
}

impl PageDocument for FakeHost {
    fn url(&self) -> String {
        self.page.lock().unwrap().url()
    }

    fn document_title(&self) -> String {
        self.page.lock().unwrap().document_title()
    }

    fn select_texts(&self, selector: &str) -> Result<Vec<String>, AppError> {
        self.page.lock().unwrap().select_texts(selector)
    }
}

impl HostSurface for FakeHost {
    fn has_action_button(&self) -> bool {
        self.log.lock().unwrap().button
    }

    fn insert_action_button(&self) {
        self.log.lock().unwrap().button = true;
    }

    fn remove_action_button(&self) {
        self.log.lock().unwrap().button = false;
    }

    fn show_panel(&self, panel: &Panel) {
        self.log.lock().unwrap().panels.push(panel.clone());
    }

    fn clear_panel(&self) {
        self.log.lock().unwrap().cleared += 1;
    }

    fn notify(&self, notification: &Notification) {
        self.log.lock().unwrap().notifications.push(notification.clone());
    }
}

/// Relay channel that answers every message with a fixed reply after a
/// delay, counting calls.
#[allow(dead_code)]
pub struct ScriptedChannel {
    reply: Result<RelayReply, fn() -> AppError>,
    delay: Duration,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedChannel {
    pub fn replying(reply: RelayReply, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(make: fn() -> AppError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(make),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelayChannel for ScriptedChannel {
    async fn send(&self, _request: RelayRequest) -> Result<RelayReply, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(make) => Err(make()),
        }
    }
}
