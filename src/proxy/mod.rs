//! Cookie-forwarding proxy routes to the backend.
//!
//! Every handler follows the same contract:
//!
//! 1. resolve the backend base (internal URL first, then public); none
//!    configured is a 500 and nothing is sent upstream;
//! 2. read the `access_token` cookie once; a missing cookie is not an error
//!    here, the backend answers 401 on its own;
//! 3. issue the backend request with only that token attached as a `cookie`
//!    header; the browser's other cookies are never forwarded;
//! 4. relay the backend status verbatim; non-2xx is not an error at this
//!    layer. An unreachable backend becomes a 502.
//!
//! - [`sse`]: streaming chat send
//! - [`rest`]: buffered list, delete, messages, create and profile calls

pub mod rest;
pub mod sse;

use crate::AppState;
use crate::auth::AccessToken;
use crate::client::ApiClient;
use crate::error::{ConfigError, GatewayError};

/// Client bound to the proxy base URL and the caller's token.
pub fn upstream_client(
    state: &AppState,
    token: Option<AccessToken>,
) -> Result<ApiClient, GatewayError> {
    let base = state
        .config
        .api
        .proxy_base()
        .ok_or(ConfigError::MissingBackendUrl)?;
    Ok(ApiClient::new(base, state.http.clone()).with_token(token))
}

/// Append the original query string, if any, to an upstream path.
pub fn with_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}
