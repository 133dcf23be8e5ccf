//! In-process stand-in for the dashboard backend, bound to an ephemeral
//! port. Records every request it sees and can inject failures, delays and
//! malformed bodies per `"METHOD /path"` key.

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::models::{Bookmark, ChatMessage, Reminder, Task, TopologySnapshot};

const PREFIX: &str = "/dashboard/api";

#[derive(Default)]
pub struct MockData {
    pub bookmarks: Vec<Bookmark>,
    pub tasks: Vec<Task>,
    pub schedule: Vec<Reminder>,
    pub chat: Vec<ChatMessage>,
    pub topology: TopologySnapshot,
    requests: Vec<String>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    malformed: HashSet<String>,
    next_id: i64,
}

#[derive(Clone)]
pub struct MockBackend {
    data: Arc<Mutex<MockData>>,
    pub base_url: String,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        let backend = Self {
            data: Arc::new(Mutex::new(MockData {
                next_id: 1_000,
                ..Default::default()
            })),
            base_url: format!("http://{}{}", addr, PREFIX),
        };

        let app = Router::new()
            .route(&route("/health"), get(health))
            .route(&route("/cloudflare-tunnel"), get(tunnel))
            .route(&route("/bookmarks"), get(list_bookmarks).post(create_bookmark))
            .route(
                &route("/bookmarks/{id}"),
                put(update_bookmark).delete(delete_bookmark),
            )
            .route(&route("/tasks"), get(list_tasks))
            .route(&route("/schedule"), get(list_schedule).post(create_reminder))
            .route(&route("/chat"), get(list_chat).post(post_chat))
            .route(&route("/topology"), get(topology))
            .route(&route("/topology/refresh"), get(topology))
            .layer(middleware::from_fn_with_state(backend.clone(), intercept))
            .with_state(backend.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        backend
    }

    pub fn with_data<R>(&self, f: impl FnOnce(&mut MockData) -> R) -> R {
        let mut data = self.data.lock().unwrap();
        f(&mut data)
    }

    pub fn requests(&self) -> Vec<String> {
        self.with_data(|d| d.requests.clone())
    }

    pub fn request_count(&self, key: &str) -> usize {
        self.with_data(|d| d.requests.iter().filter(|r| r.as_str() == key).count())
    }

    pub fn fail(&self, key: &str, status: u16) {
        self.with_data(|d| d.failures.insert(key.to_string(), status));
    }

    pub fn delay(&self, key: &str, delay: Duration) {
        self.with_data(|d| d.delays.insert(key.to_string(), delay));
    }

    pub fn malformed(&self, key: &str) {
        self.with_data(|d| d.malformed.insert(key.to_string()));
    }
}

fn route(path: &str) -> String {
    format!("{}{}", PREFIX, path)
}

async fn intercept(State(backend): State<MockBackend>, req: Request, next: Next) -> Response {
    let key = format!(
        "{} {}",
        req.method(),
        req.uri().path().trim_start_matches(PREFIX)
    );
    let (failure, delay, malformed) = backend.with_data(|d| {
        d.requests.push(key.clone());
        (
            d.failures.get(&key).copied(),
            d.delays.get(&key).copied(),
            d.malformed.contains(&key),
        )
    });

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({ "detail": "injected failure" }))).into_response();
    }
    if malformed {
        return (StatusCode::OK, "{not json").into_response();
    }
    next.run(req).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "timestamp": 1_760_600_000.0 }))
}

async fn tunnel() -> Json<Value> {
    Json(json!({
        "status": "running",
        "tunnel_id": "6f1e-nanobot",
        "uptime": 4_000,
        "pid": 4242,
        "error": null
    }))
}

async fn list_bookmarks(State(b): State<MockBackend>) -> Json<Vec<Bookmark>> {
    Json(b.with_data(|d| d.bookmarks.clone()))
}

async fn create_bookmark(State(b): State<MockBackend>, Json(mut bm): Json<Bookmark>) -> Json<Value> {
    let id = b.with_data(|d| {
        d.next_id += 1;
        bm.id = d.next_id;
        bm.created = "2026-10-16T09:00:00".to_string();
        d.bookmarks.push(bm);
        d.next_id
    });
    Json(json!({ "success": true, "id": id }))
}

async fn update_bookmark(
    State(b): State<MockBackend>,
    Path(id): Path<i64>,
    Json(bm): Json<Bookmark>,
) -> Response {
    b.with_data(|d| match d.bookmarks.iter_mut().find(|x| x.id == id) {
        Some(existing) => {
            existing.title = bm.title;
            existing.url = bm.url;
            existing.folder = bm.folder;
            existing.tags = bm.tags;
            Json(json!({ "success": true })).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Bookmark not found" })),
        )
            .into_response(),
    })
}

async fn delete_bookmark(State(b): State<MockBackend>, Path(id): Path<i64>) -> Json<Value> {
    b.with_data(|d| d.bookmarks.retain(|x| x.id != id));
    Json(json!({ "success": true }))
}

async fn list_tasks(State(b): State<MockBackend>) -> Json<Vec<Task>> {
    Json(b.with_data(|d| d.tasks.clone()))
}

async fn list_schedule(State(b): State<MockBackend>) -> Json<Vec<Reminder>> {
    Json(b.with_data(|d| d.schedule.clone()))
}

async fn create_reminder(State(b): State<MockBackend>, Json(r): Json<Reminder>) -> Json<Value> {
    b.with_data(|d| d.schedule.push(r));
    Json(json!({ "success": true }))
}

async fn list_chat(State(b): State<MockBackend>) -> Json<Vec<ChatMessage>> {
    Json(b.with_data(|d| d.chat.clone()))
}

/// Stores the message the way the real backend does: without the client id
/// and restamped with the server's clock.
async fn post_chat(State(b): State<MockBackend>, Json(mut msg): Json<ChatMessage>) -> Json<Value> {
    msg.id.clear();
    msg.timestamp = chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string();
    b.with_data(|d| d.chat.push(msg));
    Json(json!({ "success": true }))
}

async fn topology(State(b): State<MockBackend>) -> Json<TopologySnapshot> {
    Json(b.with_data(|d| d.topology.clone()))
}
