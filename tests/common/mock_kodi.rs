//! In-process stand-in for a Kodi web server
//!
//! Serves `POST /jsonrpc` from a per-method table of canned replies and any
//! other `GET` path from an in-memory file map. Every request is recorded so
//! tests can assert on what the client actually called.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use base64::Engine;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Canned reply for one RPC method
#[derive(Debug, Clone)]
pub enum Reply {
    /// `{"jsonrpc":"2.0","id":1,"result":<value>}`
    Result(Value),
    /// Arbitrary status and body, for malformed or failing responses
    Raw { status: u16, body: String },
}

#[derive(Default)]
struct MockState {
    rpc: HashMap<String, Reply>,
    files: HashMap<String, Vec<u8>>,
    auth: Option<String>,
    calls: Mutex<Vec<String>>,
    downloads: Mutex<Vec<String>>,
    requests: AtomicUsize,
    rejected: AtomicUsize,
}

/// Builder for a [`MockKodi`]
#[derive(Default)]
pub struct MockKodiBuilder {
    state: MockState,
}

impl MockKodiBuilder {
    /// Reply to `method` with a successful result
    pub fn result(mut self, method: &str, result: Value) -> Self {
        self.state
            .rpc
            .insert(method.to_string(), Reply::Result(result));
        self
    }

    /// Reply to `method` with a raw status and body
    pub fn raw(mut self, method: &str, status: u16, body: &str) -> Self {
        self.state.rpc.insert(
            method.to_string(),
            Reply::Raw {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Serve `body` at the absolute request path `path`
    pub fn file(mut self, path: &str, body: &[u8]) -> Self {
        self.state.files.insert(path.to_string(), body.to_vec());
        self
    }

    /// Require HTTP basic auth on every request
    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", username, password));
        self.state.auth = Some(format!("Basic {}", token));
        self
    }

    pub async fn spawn(self) -> MockKodi {
        let state = Arc::new(self.state);

        let app = Router::new()
            .route("/jsonrpc", post(rpc))
            .fallback(file)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock Kodi failed");
        });

        MockKodi {
            base_url: format!("http://127.0.0.1:{}", port),
            port,
            state,
            _shutdown_tx: shutdown_tx,
        }
    }
}

/// A running mock; shuts down when dropped
pub struct MockKodi {
    /// e.g. `http://127.0.0.1:12345`
    pub base_url: String,
    pub port: u16,
    state: Arc<MockState>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl MockKodi {
    pub fn builder() -> MockKodiBuilder {
        MockKodiBuilder::default()
    }

    /// RPC methods in the order they were called
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn called(&self, method: &str) -> bool {
        self.calls().iter().any(|m| m == method)
    }

    /// Paths of every non-RPC request, in order
    pub fn downloads(&self) -> Vec<String> {
        self.state.downloads.lock().unwrap().clone()
    }

    /// Total requests received, RPC and downloads alike
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Requests refused for missing or wrong credentials
    pub fn rejected_count(&self) -> usize {
        self.state.rejected.load(Ordering::SeqCst)
    }
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    let Some(expected) = &state.auth else {
        return true;
    };
    let ok = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);
    if !ok {
        state.rejected.fetch_add(1, Ordering::SeqCst);
    }
    ok
}

async fn rpc(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let request: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid json").into_response(),
    };
    let method = request["method"].as_str().unwrap_or_default().to_string();
    state.calls.lock().unwrap().push(method.clone());

    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.rpc.get(&method) {
        Some(Reply::Result(result)) => {
            let envelope = json!({"jsonrpc": "2.0", "id": request["id"], "result": result});
            (
                [(header::CONTENT_TYPE, "application/json")],
                envelope.to_string(),
            )
                .into_response()
        }
        Some(Reply::Raw { status, body }) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => {
            let envelope = json!({
                "jsonrpc": "2.0",
                "id": request["id"],
                "error": {"code": -32601, "message": "Method not found."}
            });
            (
                [(header::CONTENT_TYPE, "application/json")],
                envelope.to_string(),
            )
                .into_response()
        }
    }
}

async fn file(State(state): State<Arc<MockState>>, headers: HeaderMap, uri: Uri) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    state.downloads.lock().unwrap().push(uri.path().to_string());

    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.files.get(uri.path()) {
        Some(body) => (
            [(header::CONTENT_TYPE, "image/jpeg")],
            body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
