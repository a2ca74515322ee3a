//! Local HTTP stubs for the homework API and the Telegram Bot API

// Each test binary uses a different subset of the stubs.
#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A request seen by the homework API stub.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[derive(Clone)]
struct HomeworkStub {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<CapturedRequest>>>,
}

async fn homework_statuses(
    State(stub): State<HomeworkStub>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    stub.seen.lock().unwrap().push(CapturedRequest {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        query,
    });
    (stub.status, stub.body.clone())
}

/// Homework API stub answering every request with `status` and `body`.
///
/// Returns the endpoint URL and the requests it received.
pub async fn homework_api(
    status: StatusCode,
    body: &str,
) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = HomeworkStub {
        status,
        body: body.to_string(),
        seen: seen.clone(),
    };
    let router = Router::new()
        .route("/api/user_api/homework_statuses/", get(homework_statuses))
        .with_state(stub);
    let base = spawn_stub(router).await;
    (format!("{}/api/user_api/homework_statuses/", base), seen)
}

#[derive(Clone)]
struct TelegramStub {
    accept: bool,
    seen: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn send_message(
    State(stub): State<TelegramStub>,
    Path(bot): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.seen.lock().unwrap().push((bot, body));
    if stub.accept {
        (StatusCode::OK, Json(json!({"ok": true, "result": {"message_id": 1}})))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"})),
        )
    }
}

/// Telegram Bot API stub. Records `(path segment, JSON body)` of each `sendMessage`.
pub async fn telegram_api(accept: bool) -> (String, Arc<Mutex<Vec<(String, Value)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = TelegramStub {
        accept,
        seen: seen.clone(),
    };
    let router = Router::new()
        .route("/{bot}/sendMessage", post(send_message))
        .with_state(stub);
    (spawn_stub(router).await, seen)
}

/// Telegram Bot API stub that answers `200 OK` with a non-JSON body.
pub async fn telegram_api_garbled() -> String {
    let router = Router::new().route(
        "/{bot}/sendMessage",
        post(|| async { (StatusCode::OK, "<html>gateway</html>") }),
    );
    spawn_stub(router).await
}
