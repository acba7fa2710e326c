// In-process stand-in for the reqres user and registration API.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY: &str = "stub-key";
const TIMESTAMP: &str = "2026-10-18T12:00:00.000Z";
/// How long `/api/slow` stalls before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

/// How the stub deviates from the real contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Conforming,
    /// Create answers 200 without `createdAt`; everything else conforms.
    Drifted,
}

/// One request seen by the stub.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct StubState {
    behavior: Behavior,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct ReqresStubHandle {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl ReqresStubHandle {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for ReqresStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

pub async fn spawn_reqres_stub() -> ReqresStubHandle {
    spawn_reqres_stub_with(Behavior::Conforming).await
}

pub async fn spawn_reqres_stub_with(behavior: Behavior) -> ReqresStubHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("stub bind");
    let addr = listener.local_addr().expect("stub local addr");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        behavior,
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/api/users", post(create_user))
        .route(
            "/api/users/{id}",
            axum::routing::put(update_user).patch(update_user).delete(delete_user),
        )
        .route("/api/register", post(register))
        .route("/api/broken", get(broken).post(broken))
        .route("/api/slow", get(slow))
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let _ = server.await;
    });

    ReqresStubHandle {
        addr,
        requests,
        shutdown: Some(shutdown_tx),
        join: Some(join),
    }
}

fn record(state: &StubState, method: Method, path: String, headers: &HeaderMap, body: &Bytes) -> bool {
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let authorized = api_key.as_deref() == Some(API_KEY);
    let body = serde_json::from_slice(body.as_ref()).ok();
    if let Ok(mut entries) = state.requests.lock() {
        entries.push(RecordedRequest {
            method,
            path,
            api_key,
            body,
        });
    }
    authorized
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Missing API key."})),
    )
        .into_response()
}

fn body_object(bytes: &Bytes) -> Map<String, Value> {
    match serde_json::from_slice(bytes.as_ref()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

async fn create_user(State(state): State<StubState>, headers: HeaderMap, bytes: Bytes) -> Response {
    if !record(&state, Method::POST, "/api/users".into(), &headers, &bytes) {
        return unauthorized();
    }
    let mut body = body_object(&bytes);
    body.insert("id".into(), json!("512"));
    match state.behavior {
        Behavior::Conforming => {
            body.insert("createdAt".into(), json!(TIMESTAMP));
            (StatusCode::CREATED, Json(Value::Object(body))).into_response()
        }
        Behavior::Drifted => (StatusCode::OK, Json(Value::Object(body))).into_response(),
    }
}

async fn update_user(
    State(state): State<StubState>,
    method: Method,
    Path(id): Path<String>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    if !record(&state, method, format!("/api/users/{id}"), &headers, &bytes) {
        return unauthorized();
    }
    let mut body = body_object(&bytes);
    body.insert("updatedAt".into(), json!(TIMESTAMP));
    (StatusCode::OK, Json(Value::Object(body))).into_response()
}

async fn delete_user(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    if !record(&state, Method::DELETE, format!("/api/users/{id}"), &headers, &bytes) {
        return unauthorized();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn register(State(state): State<StubState>, headers: HeaderMap, bytes: Bytes) -> Response {
    if !record(&state, Method::POST, "/api/register".into(), &headers, &bytes) {
        return unauthorized();
    }
    let body = body_object(&bytes);
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let error = if email.is_empty() {
        "Missing email or username"
    } else if password.is_empty() {
        "Missing password"
    } else if email != "eve.holt@reqres.in" {
        "Note: Only defined users succeed registration"
    } else {
        return Json(json!({"id": 4, "token": "QpwL5tke4Pnpja7X4"})).into_response();
    };
    (StatusCode::BAD_REQUEST, Json(json!({"error": error}))).into_response()
}

async fn broken(State(state): State<StubState>, method: Method, headers: HeaderMap, bytes: Bytes) -> Response {
    record(&state, method, "/api/broken".into(), &headers, &bytes);
    (
        StatusCode::BAD_GATEWAY,
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body>502 Bad Gateway</body></html>",
    )
        .into_response()
}

async fn slow(State(state): State<StubState>, headers: HeaderMap, bytes: Bytes) -> Response {
    record(&state, Method::GET, "/api/slow".into(), &headers, &bytes);
    tokio::time::sleep(SLOW_DELAY).await;
    Json(json!({"data": []})).into_response()
}
