//! In-process stand-in for the notes API, recording every request it sees.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Route names usable with `Stub::fail`.
pub const LOGIN: &str = "login";
pub const ME: &str = "me";
pub const LIST: &str = "list";
pub const CREATE: &str = "create";
pub const DELETE: &str = "delete";
pub const UPGRADE: &str = "upgrade";

pub struct Stub {
    requests: Mutex<Vec<Recorded>>,
    notes: Mutex<Vec<Value>>,
    failures: Mutex<HashMap<&'static str, (StatusCode, Value)>>,
    next_id: AtomicU64,
    upgraded: AtomicBool,
}

impl Stub {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            notes: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(7),
            upgraded: AtomicBool::new(false),
        }
    }

    /// Make `route` answer with `status` and `body` until `recover` is called.
    pub fn fail(&self, route: &'static str, status: StatusCode, body: Value) {
        self.failures.lock().unwrap().insert(route, (status, body));
    }

    pub fn recover(&self, route: &'static str) {
        self.failures.lock().unwrap().remove(route);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    pub fn set_notes(&self, notes: Vec<Value>) {
        *self.notes.lock().unwrap() = notes;
    }

    pub fn is_upgraded(&self) -> bool {
        self.upgraded.load(Ordering::SeqCst)
    }

    fn record(&self, method: &'static str, path: String, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        self.requests.lock().unwrap().push(Recorded {
            method,
            path,
            authorization,
            body,
        });
    }

    fn failure(&self, route: &'static str) -> Option<Response> {
        self.failures
            .lock()
            .unwrap()
            .get(route)
            .map(|(status, body)| (*status, Json(body.clone())).into_response())
    }
}

pub struct StubServer {
    pub addr: SocketAddr,
    pub stub: Arc<Stub>,
}

impl StubServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub async fn spawn_stub() -> StubServer {
    let stub = Arc::new(Stub::new());

    let app = Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", delete(delete_note))
        .route("/tenants/{slug}/upgrade", post(upgrade))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    StubServer { addr, stub }
}

fn user_for(token: &str) -> Option<Value> {
    match token {
        "t1" => Some(json!({ "role": "Admin", "tenant_id": "acme" })),
        "t2" => Some(json!({ "role": "Member", "tenant_id": "acme" })),
        _ => None,
    }
}

fn bearer(headers: &HeaderMap) -> Option<Value> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(user_for)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid token" })),
    )
        .into_response()
}

async fn login(State(stub): State<Arc<Stub>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    stub.record("POST", "/login".to_string(), &headers, body.clone());
    if let Some(resp) = stub.failure(LOGIN) {
        return resp;
    }

    let token = match (body["email"].as_str(), body["password"].as_str()) {
        (Some("admin@acme.test"), Some("password")) => "t1",
        (Some("user@acme.test"), Some("password")) => "t2",
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid credentials" })),
            )
                .into_response();
        }
    };

    Json(json!({ "token": token, "user": user_for(token) })).into_response()
}

async fn me(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    stub.record("GET", "/me".to_string(), &headers, Value::Null);
    if let Some(resp) = stub.failure(ME) {
        return resp;
    }
    let Some(user) = bearer(&headers) else {
        return unauthorized();
    };

    let plan = if stub.is_upgraded() { "Pro" } else { "Free" };
    Json(json!({
        "user": user,
        "tenant": { "slug": "acme", "name": "Acme", "plan": plan }
    }))
    .into_response()
}

async fn list_notes(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Response {
    stub.record("GET", "/notes".to_string(), &headers, Value::Null);
    if let Some(resp) = stub.failure(LIST) {
        return resp;
    }
    if bearer(&headers).is_none() {
        return unauthorized();
    }

    let notes = stub.notes.lock().unwrap().clone();
    Json(Value::Array(notes)).into_response()
}

async fn create_note(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record("POST", "/notes".to_string(), &headers, body.clone());
    if let Some(resp) = stub.failure(CREATE) {
        return resp;
    }
    if bearer(&headers).is_none() {
        return unauthorized();
    }

    let note = json!({
        "id": stub.next_id.fetch_add(1, Ordering::SeqCst),
        "title": body["title"],
        "content": body["content"],
        "created_at": "2024-01-01T00:00:00Z",
    });
    stub.notes.lock().unwrap().insert(0, note.clone());
    (StatusCode::CREATED, Json(note)).into_response()
}

async fn delete_note(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    stub.record("DELETE", format!("/notes/{id}"), &headers, Value::Null);
    if let Some(resp) = stub.failure(DELETE) {
        return resp;
    }
    if bearer(&headers).is_none() {
        return unauthorized();
    }

    let mut notes = stub.notes.lock().unwrap();
    let before = notes.len();
    notes.retain(|n| n["id"].to_string().trim_matches('"') != id);
    if notes.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Note not found" })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn upgrade(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    stub.record("POST", format!("/tenants/{slug}/upgrade"), &headers, Value::Null);
    if let Some(resp) = stub.failure(UPGRADE) {
        return resp;
    }
    let Some(user) = bearer(&headers) else {
        return unauthorized();
    };
    if user["role"] != "Admin" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Access denied: Admin role required." })),
        )
            .into_response();
    }

    stub.upgraded.store(true, Ordering::SeqCst);
    Json(json!({ "message": format!("Tenant {slug} has been upgraded to Pro.") })).into_response()
}
