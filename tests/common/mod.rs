//! Shared helpers: a recording fake backend and gateway state builders.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{Path, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use exam_chat_gateway::{
    AppState,
    config::{AppConfig, AuthConfig, ServerConfig},
    endpoints::ApiEndpoints,
};
use serde_json::json;

/// What the fake backend saw for one request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub cookie: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
    closed_streams: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn all(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// How many endless event streams have been dropped by the server.
    pub fn closed_streams(&self) -> usize {
        self.closed_streams.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Recorded {
        self.all().pop().expect("backend received no request")
    }

    fn push(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) {
        let value = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            cookie: value(header::COOKIE),
            accept: value(header::ACCEPT),
            content_type: value(header::CONTENT_TYPE),
            body,
        });
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("access_token=") && !v.contains("access_token=expired"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Not authenticated" })),
    )
        .into_response()
}

async fn record_all(State(recorder): State<Recorder>, req: Request<Body>) -> Request<Body> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    recorder.push(parts.method.clone(), &parts.uri, &parts.headers, bytes.clone());
    Request::from_parts(parts, Body::from(bytes))
}

/// Counts a stream as closed when the server drops it.
struct CloseGuard(Arc<AtomicUsize>);

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// `data: 0` right away, then one event every 300ms, forever.
fn endless_events(recorder: &Recorder) -> Body {
    let guard = CloseGuard(Arc::clone(&recorder.closed_streams));
    let stream = futures::stream::unfold((0u64, guard), |(n, guard)| async move {
        if n > 0 {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        let event = Bytes::from(format!("data: {n}\n\n"));
        Some((Ok::<_, std::io::Error>(event), (n + 1, guard)))
    });
    Body::from_stream(stream)
}

async fn chat_send(State(recorder): State<Recorder>, uri: Uri, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    if uri.query().is_some_and(|q| q.contains("variant=endless")) {
        return Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(endless_events(&recorder))
            .unwrap();
    }

    let chunks = vec![
        Ok::<_, std::io::Error>(Bytes::from_static(
            b"data: {\"type\":\"text-delta\",\"delta\":\"Ol\"}\n\n",
        )),
        Ok(Bytes::from_static(b"data: {\"type\":\"text-delta\",\"delta\":\"a!\"}\n\n")),
        Ok(Bytes::from_static(b"data: [DONE]\n\n")),
    ];
    let body = Body::from_stream(futures::stream::iter(chunks));

    // `variant=bare` answers without a content type.
    if uri.query().is_some_and(|q| q.contains("variant=bare")) {
        return Response::new(body);
    }
    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream; charset=utf-8")
        .header("x-vercel-ai-ui-message-stream", "v1")
        .body(body)
        .unwrap()
}

pub fn sample_chats() -> serde_json::Value {
    json!({
        "chats": [
            {
                "id": "c1",
                "title": null,
                "preview": "Quando é a segunda fase?\nE a primeira?",
                "last_role": "user",
                "updated_at": "2025-06-15T11:55:00Z"
            },
            {
                "id": "c2",
                "title": null,
                "preview": null,
                "last_role": null,
                "updated_at": "2025-06-14T12:00:00"
            },
            {
                "id": "c3",
                "title": "Cotas e isenções",
                "preview": "O candidato pode pedir isenção da taxa de inscrição se cumprir os requisitos do edital publicado pela Comvest",
                "last_role": "assistant",
                "updated_at": "not a date"
            }
        ]
    })
}

async fn list_chats(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(sample_chats()).into_response()
}

async fn delete_chat(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Chat not found" })),
        )
            .into_response();
    }
    Json(json!({ "message": "Chat deleted successfully" })).into_response()
}

async fn chat_messages(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": id,
        "messages": [{ "id": "m1", "role": "user", "parts": [{ "type": "text", "text": "Oi" }] }]
    }))
    .into_response()
}

async fn create_chat(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "id": "new-chat" })).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "id": 7, "login": "octocat", "name": "Octo Cat", "avatar_url": null }))
        .into_response()
}

/// Start a fake backend on an ephemeral port.
pub async fn spawn_backend() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/chat", post(chat_send).get(list_chats))
        .route("/chat/create", post(create_chat))
        .route("/chat/{id}", get(chat_messages))
        .route("/chat/{id}", delete(delete_chat))
        .route("/auth/me", get(me))
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .layer(axum::middleware::map_request_with_state(
            recorder.clone(),
            record_all,
        ))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorder)
}

/// A base URL nothing listens on.
pub fn dead_backend() -> String {
    "http://127.0.0.1:1".to_string()
}

pub fn config(public: Option<String>, internal: Option<String>) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        api: ApiEndpoints::new(public, internal),
        auth: AuthConfig {
            home_redirect: "/".to_string(),
            cookie_max_age_secs: 604_800,
        },
        production: false,
        locale: "pt-BR".to_string(),
    }
}

pub fn state_for(base_url: &str) -> AppState {
    AppState::new(config(Some(base_url.to_string()), None))
}

pub fn unconfigured_state() -> AppState {
    AppState::new(config(None, None))
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
