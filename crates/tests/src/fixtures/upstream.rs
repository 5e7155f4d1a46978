//! Local stand-ins for the hosted transcription and language model APIs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

pub const API_KEY: &str = "test-key";

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream server");
    });
    format!("http://{addr}")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Authentication error, API token missing/invalid" })),
    )
        .into_response()
}

/// Fake speech-to-text API mounted under `/v2`.
#[derive(Clone, Default)]
pub struct FakeTranscriptionApi {
    /// Status bodies returned by successive polls; `processing` once drained.
    pub statuses: Arc<Mutex<VecDeque<Value>>>,
    /// Bodies posted to `/v2/transcript`.
    pub transcript_requests: Arc<Mutex<Vec<Value>>>,
    /// Sizes of uploaded audio bodies.
    pub uploads: Arc<Mutex<Vec<usize>>>,
    /// When set, the upload answer omits `upload_url`.
    pub broken_upload: bool,
}

impl FakeTranscriptionApi {
    pub fn with_statuses(statuses: Vec<Value>) -> Self {
        Self {
            statuses: Arc::new(Mutex::new(statuses.into())),
            ..Self::default()
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/v2/upload", post(upload))
            .route("/v2/transcript", post(create_transcript))
            .route("/v2/transcript/{id}", get(transcript_status))
            .with_state(self)
    }
}

async fn upload(State(api): State<FakeTranscriptionApi>, headers: HeaderMap, body: Bytes) -> Response {
    if header(&headers, "authorization") != Some(API_KEY) {
        return unauthorized();
    }
    api.uploads.lock().unwrap().push(body.len());

    if api.broken_upload {
        return Json(json!({ "message": "stored" })).into_response();
    }
    Json(json!({ "upload_url": "https://cdn.transcription.test/upload/8c1f" })).into_response()
}

async fn create_transcript(
    State(api): State<FakeTranscriptionApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if header(&headers, "authorization") != Some(API_KEY) {
        return unauthorized();
    }
    api.transcript_requests.lock().unwrap().push(body);
    Json(json!({ "id": "tx-7781", "status": "queued" })).into_response()
}

async fn transcript_status(
    State(api): State<FakeTranscriptionApi>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if header(&headers, "authorization") != Some(API_KEY) {
        return unauthorized();
    }
    let body = api
        .statuses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| json!({ "id": id, "status": "processing" }));
    Json(body).into_response()
}

/// Fake chat-completion API mounted under `/v1`.
#[derive(Clone)]
pub struct FakeChatApi {
    pub status: StatusCode,
    pub response: Value,
    /// Bodies posted to `/v1/chat/completions`.
    pub requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeChatApi {
    pub fn new(status: StatusCode, response: Value) -> Self {
        Self {
            status,
            response,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/v1/chat/completions", post(chat_completion))
            .with_state(self)
    }
}

async fn chat_completion(
    State(api): State<FakeChatApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let expected = format!("Bearer {API_KEY}");
    if header(&headers, "authorization") != Some(expected.as_str()) {
        return unauthorized();
    }
    api.requests.lock().unwrap().push(body);
    (api.status, Json(api.response.clone())).into_response()
}
