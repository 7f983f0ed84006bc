//! Buffered proxy routes: chat list, delete, messages, create and profile.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, Uri, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::{upstream_client, with_query};
use crate::AppState;
use crate::auth::AccessToken;
use crate::endpoints::path_segment;
use crate::error::GatewayError;

/// GET /api/chat?limit=<n>
pub async fn list_chats(
    State(state): State<AppState>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, GatewayError> {
    forward(&state, &jar, Method::GET, &with_query("/chat", uri.query())).await
}

/// DELETE /api/chat/{id}
pub async fn delete_chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(chat_id): Path<String>,
) -> Result<Response, GatewayError> {
    let path = format!("/chat/{}", path_segment(&chat_id));
    forward(&state, &jar, Method::DELETE, &path).await
}

/// GET /api/chat/{id}
pub async fn chat_messages(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(chat_id): Path<String>,
) -> Result<Response, GatewayError> {
    let path = format!("/chat/{}", path_segment(&chat_id));
    forward(&state, &jar, Method::GET, &path).await
}

/// POST /api/chat/create
pub async fn create_chat(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, GatewayError> {
    forward(&state, &jar, Method::POST, "/chat/create").await
}

/// GET /api/me
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Result<Response, GatewayError> {
    forward(&state, &jar, Method::GET, "/auth/me").await
}

async fn forward(
    state: &AppState,
    jar: &CookieJar,
    method: Method,
    path: &str,
) -> Result<Response, GatewayError> {
    let upstream = upstream_client(state, AccessToken::from_jar(jar))?;
    let response = upstream.request(method.clone(), path).send().await?;
    debug!(
        name: "proxy.rest.relayed",
        method = %method,
        path = %path,
        status = %response.status(),
        "Relaying backend response"
    );
    relay_buffered(response).await
}

/// Read the whole backend body and relay it with its status and type.
pub async fn relay_buffered(upstream: reqwest::Response) -> Result<Response, GatewayError> {
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let text = upstream.text().await?;

    let mut response = (status, text).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}
