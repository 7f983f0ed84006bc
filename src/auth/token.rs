//! The access-token cookie.

use axum::http::HeaderValue;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the HTTP-only cookie holding the backend bearer token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Opaque bearer token issued by the backend after OAuth sign-in.
///
/// Extracted once per request and passed explicitly to every outgoing call.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl AccessToken {
    /// Wrap a raw token; blank input yields `None`.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// Read the token from the request cookies, if any.
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        jar.get(ACCESS_TOKEN_COOKIE)
            .and_then(|c| Self::new(c.value()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for a `cookie` request header sent to the backend.
    #[must_use]
    pub fn cookie_header(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!("{ACCESS_TOKEN_COOKIE}={}", self.0)).ok()
    }
}

/// Build the `access_token` cookie set on the browser after sign-in.
#[must_use]
pub fn access_cookie(token: &AccessToken, secure: bool, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token.as_str().to_owned()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Cookie used to clear `access_token` on logout.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, "")).path("/").build()
}
