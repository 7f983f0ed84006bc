//! POST /api/chat - relay a chat send and stream the backend's SSE body back.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, Uri, header},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use futures::TryStreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{upstream_client, with_query};
use crate::AppState;
use crate::auth::AccessToken;
use crate::error::GatewayError;

const EVENT_STREAM: &str = "text/event-stream";

/// Forward the request body untouched and pipe the response body through.
///
/// Both directions stream: the request body is not collected, so no body
/// size limit applies. The upstream connection lives exactly as long as the
/// returned body: when the browser disconnects, axum drops the body stream
/// and with it the backend response.
pub async fn chat_send(
    State(state): State<AppState>,
    jar: CookieJar,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, GatewayError> {
    let request_id = Uuid::new_v4();
    let token = AccessToken::from_jar(&jar);
    let has_token = token.is_some();
    let upstream = upstream_client(&state, token)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    info!(
        name: "proxy.chat.send",
        request_id = %request_id,
        has_token,
        content_length = headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-"),
        "Relaying chat send"
    );

    let mut request = upstream
        .request(Method::POST, &with_query("/chat", uri.query()))
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT, EVENT_STREAM);
    if let Some(length) = headers.get(header::CONTENT_LENGTH) {
        request = request.header(header::CONTENT_LENGTH, length.clone());
    }
    let response = request
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await?;

    debug!(
        request_id = %request_id,
        status = %response.status(),
        "Backend stream opened"
    );

    Ok(relay_stream(response, request_id))
}

/// Build the downstream response around the backend's body stream.
pub fn relay_stream(upstream: reqwest::Response, request_id: Uuid) -> Response {
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(EVENT_STREAM));

    let stream = upstream.bytes_stream().inspect_err(move |e| {
        warn!(
            name: "proxy.chat.stream_error",
            request_id = %request_id,
            error = %e,
            "Backend stream ended with an error"
        );
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    let h = response.headers_mut();
    h.insert(header::CONTENT_TYPE, content_type);
    h.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    h.insert("X-Accel-Buffering", HeaderValue::from_static("no"));
    response
}
