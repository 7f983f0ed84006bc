//! Backend base-URL resolution and URL composition.
//!
//! The gateway knows the backend under two names: a browser-facing public URL
//! (required) and an optional internal URL only reachable from the server
//! side. Which one to use depends on where the call originates.

use serde::Deserialize;

use crate::error::ConfigError;

/// Where an outgoing API call is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Server-side code (route handlers, server-rendered pages).
    Server,
    /// Code whose URLs end up in the browser (links, redirects).
    Browser,
}

/// The configured backend URLs.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Browser-facing backend URL.
    #[serde(default)]
    pub public_url: Option<String>,
    /// Server-only override, e.g. a cluster-internal hostname.
    #[serde(default)]
    pub internal_url: Option<String>,
}

impl ApiEndpoints {
    /// Create endpoints from optional public and internal URLs.
    #[must_use]
    pub fn new(public_url: Option<String>, internal_url: Option<String>) -> Self {
        Self {
            public_url,
            internal_url,
        }
    }

    fn public(&self) -> Option<&str> {
        non_blank(self.public_url.as_deref())
    }

    fn internal(&self) -> Option<&str> {
        non_blank(self.internal_url.as_deref())
    }

    /// Resolve exactly one base URL for a call made from `context`.
    ///
    /// Server-side calls in production prefer the internal URL. Everything
    /// else uses the public URL. A missing public URL is always an error.
    pub fn resolve(&self, context: ExecutionContext, production: bool) -> Result<&str, ConfigError> {
        let public = self.public().ok_or(ConfigError::MissingPublicUrl)?;

        if context == ExecutionContext::Server && production {
            return Ok(self.internal().unwrap_or(public));
        }
        Ok(public)
    }

    /// Base URL used by the proxy routes: internal first, then public.
    #[must_use]
    pub fn proxy_base(&self) -> Option<&str> {
        self.internal().or_else(|| self.public())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Join a base URL and a path with exactly one `/` between them.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Percent-encode an opaque id for use as a single path segment.
#[must_use]
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
