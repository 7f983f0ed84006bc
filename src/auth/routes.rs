//! Sign-in, sign-out and the cookie-setting callback.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use super::token::{AccessToken, access_cookie, removal_cookie};
use crate::AppState;
use crate::endpoints::ExecutionContext;
use crate::error::GatewayError;

#[derive(Debug, Deserialize)]
pub struct SetCookieQuery {
    #[serde(default)]
    token: Option<String>,
}

/// GET /api/set-cookie-client?token=... - Persist the token and go home.
///
/// The backend's OAuth callback redirects here; the cookie must be set by the
/// gateway so that it belongs to the gateway's own origin.
pub async fn set_cookie_client(
    State(state): State<AppState>,
    Query(query): Query<SetCookieQuery>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), GatewayError> {
    let token = query
        .token
        .and_then(AccessToken::new)
        .ok_or_else(|| GatewayError::BadRequest("missing token".into()))?;

    let cookie = access_cookie(
        &token,
        state.config.production,
        state.config.auth.cookie_max_age_secs,
    );
    let target = home_location(&state.config.auth.home_redirect, &headers);

    info!(name: "auth.cookie.set", redirect = %target, "Access token cookie set");
    Ok((jar.add(cookie), Redirect::to(&target)))
}

/// GET /api/login - Start the backend's OAuth flow.
pub async fn login(State(state): State<AppState>) -> Result<Redirect, GatewayError> {
    let client = state.api_client(ExecutionContext::Browser, None)?;
    Ok(Redirect::to(&client.auth().login_url()))
}

/// GET /api/logout - Drop the gateway cookie and let the backend finish.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let jar = jar.remove(removal_cookie());
    match state.api_client(ExecutionContext::Browser, None) {
        Ok(client) => (jar, Redirect::to(&client.auth().logout_url())).into_response(),
        // The local cookie is gone either way; fall back to the home page.
        Err(_) => (jar, Redirect::to(&state.config.auth.home_redirect)).into_response(),
    }
}

/// Turn the configured home redirect into a `Location` value.
///
/// Absolute URLs are used as-is. Paths are resolved against the forwarded
/// host and protocol when the gateway runs behind a proxy, then against
/// `Host`. Without any host the path is returned unchanged.
#[must_use]
pub fn home_location(home: &str, headers: &HeaderMap) -> String {
    if url::Url::parse(home)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
    {
        return home.to_string();
    }

    let path = if home.starts_with('/') {
        home.to_string()
    } else {
        format!("/{home}")
    };

    let host = first_header(headers, "x-forwarded-host")
        .or_else(|| first_header(headers, header::HOST.as_str()));
    match host {
        Some(host) => {
            let proto = first_header(headers, "x-forwarded-proto").unwrap_or("http");
            format!("{proto}://{host}{path}")
        }
        None => path,
    }
}

/// First hop of a possibly comma-separated forwarded header.
fn first_header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
