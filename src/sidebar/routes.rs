//! HTMX endpoints for the sidebar fragment.

use std::fmt::Write as _;

use axum::{
    extract::{Path, Query, State},
    http::HeaderValue,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::error;

use super::{DeleteOutcome, Notification, SidebarController, delete_and_notify};
use crate::AppState;
use crate::auth::AccessToken;
use crate::endpoints::ExecutionContext;
use crate::error::GatewayError;

/// How many chats the sidebar asks the backend for.
pub const SIDEBAR_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    /// Id of the chat currently open in the page.
    #[serde(default)]
    pub active: Option<String>,
}

/// Fetch the list snapshot a sidebar starts from.
pub async fn load_controller(
    state: &AppState,
    token: Option<AccessToken>,
    active: Option<String>,
) -> Result<SidebarController, GatewayError> {
    let client = state.api_client(ExecutionContext::Server, token)?;
    let chats = client.chat().list(Some(SIDEBAR_LIMIT)).await?;
    Ok(SidebarController::new(chats, active))
}

/// GET /fragments/sidebar?active=<id>
pub async fn sidebar_fragment(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ActiveQuery>,
) -> Result<Html<String>, GatewayError> {
    let controller = load_controller(&state, AccessToken::from_jar(&jar), query.active).await?;
    Ok(Html(controller.render(Utc::now(), state.locale)))
}

/// DELETE /fragments/sidebar/{id}?active=<id>
///
/// The page already holds the list, so nothing is fetched here. The answer
/// is always 200 so HTMX processes its headers:
///
/// - success: empty body replacing the row, a success toast and, when the
///   open chat was deleted, `HX-Redirect` to the home view;
/// - failure (backend error, unreachable backend, missing configuration):
///   an error toast and `HX-Reswap: none`, leaving the list untouched.
pub async fn delete_from_sidebar(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(chat_id): Path<String>,
    Query(query): Query<ActiveQuery>,
) -> Response {
    let token = AccessToken::from_jar(&jar);
    let outcome = match state.api_client(ExecutionContext::Server, token) {
        Ok(client) => delete_and_notify(&client, &chat_id, query.active.as_deref()).await,
        Err(e) => {
            error!(name: "sidebar.delete.misconfigured", error = %e, "No backend to delete through");
            DeleteOutcome::failed()
        }
    };
    outcome_response(&outcome)
}

fn outcome_response(outcome: &DeleteOutcome) -> Response {
    let mut response = Html(String::new()).into_response();
    let headers = response.headers_mut();
    if let Ok(trigger) = HeaderValue::from_str(&toast_trigger(&outcome.notification)) {
        headers.insert("HX-Trigger", trigger);
    }
    if !outcome.deleted {
        headers.insert("HX-Reswap", HeaderValue::from_static("none"));
    }
    if let Some(location) = outcome
        .navigate_to
        .as_deref()
        .and_then(|target| HeaderValue::from_str(target).ok())
    {
        headers.insert("HX-Redirect", location);
    }
    response
}

/// `HX-Trigger` payload raising a `toast` event on the client.
///
/// Header values must be ASCII, so non-ASCII characters are written as JSON
/// `\u` escapes.
pub fn toast_trigger(notification: &Notification) -> String {
    let raw = serde_json::json!({ "toast": notification }).to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut [0; 2]) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_trigger_is_ascii_json() {
        let trigger = toast_trigger(&Notification::success("Conversa excluída."));
        assert!(trigger.is_ascii());
        assert!(HeaderValue::from_str(&trigger).is_ok());

        let parsed: serde_json::Value = serde_json::from_str(&trigger).unwrap();
        assert_eq!(parsed["toast"]["kind"], "success");
        assert_eq!(parsed["toast"]["message"], "Conversa excluída.");
    }

    #[test]
    fn failed_outcome_keeps_the_dom() {
        let response = outcome_response(&DeleteOutcome::failed());
        assert_eq!(response.headers()["HX-Reswap"], "none");
        assert!(response.headers().get("HX-Redirect").is_none());
        assert!(response.headers()["HX-Trigger"].to_str().unwrap().contains("error"));
    }
}
