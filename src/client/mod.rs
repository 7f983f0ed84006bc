//! Typed client for the exam-prep backend.
//!
//! The client is bound to one resolved base URL and, optionally, to the
//! caller's [`AccessToken`]. The token is attached to every request as an
//! explicit `cookie` header; the underlying `reqwest::Client` has no cookie
//! store, so nothing is ever sent ambiently.
//!
//! # Example
//!
//! ```rust,no_run
//! use exam_chat_gateway::client::ApiClient;
//!
//! # async fn example() -> Result<(), exam_chat_gateway::client::ClientError> {
//! let client = ApiClient::new("http://localhost:8000", reqwest::Client::new());
//! let chats = client.chat().list(Some(20)).await?;
//! println!("{} conversations", chats.len());
//! # Ok(())
//! # }
//! ```

pub mod types;

use reqwest::{Method, RequestBuilder, header};
use thiserror::Error;

use crate::auth::AccessToken;
use crate::endpoints::{ApiEndpoints, ExecutionContext, join_url, path_segment};
use crate::error::ConfigError;

pub use types::{
    ChatMessages, ChatSummary, CreateChatResponse, ListChatsResponse, MessagePart, StoredMessage,
    UserProfile,
};

/// Client error type.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No usable base URL.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP client for the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<AccessToken>,
}

impl ApiClient {
    /// Create a client bound to `base_url`.
    pub fn new(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            token: None,
        }
    }

    /// Create a client for calls made from `context`.
    pub fn for_context(
        endpoints: &ApiEndpoints,
        context: ExecutionContext,
        production: bool,
        http: reqwest::Client,
    ) -> std::result::Result<Self, ConfigError> {
        let base = endpoints.resolve(context, production)?;
        Ok(Self::new(base, http))
    }

    /// Attach the caller's credential to every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<AccessToken>) -> Self {
        self.token = token;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the Chat API.
    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi { client: self }
    }

    /// Access the Auth API.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    /// Access the Health API.
    pub fn health(&self) -> HealthApi<'_> {
        HealthApi { client: self }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a request with the credential attached, if there is one.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut rb = self.http.request(method, self.url(path));
        if let Some(cookie) = self.token.as_ref().and_then(AccessToken::cookie_header) {
            rb = rb.header(header::COOKIE, cookie);
        }
        rb
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

// =============================================================================
// Chat API
// =============================================================================

/// Chat API client.
#[derive(Debug)]
pub struct ChatApi<'a> {
    client: &'a ApiClient,
}

impl ChatApi<'_> {
    /// List the caller's conversations, most recent first.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<ChatSummary>> {
        let mut rb = self.client.request(Method::GET, "/chat");
        if let Some(limit) = limit {
            rb = rb.query(&[("limit", limit)]);
        }
        let body: ListChatsResponse = ApiClient::handle_response(rb.send().await?).await?;
        Ok(body.chats)
    }

    /// Create an empty conversation and return its id.
    pub async fn create(&self) -> Result<String> {
        let response = self.client.request(Method::POST, "/chat/create").send().await?;
        let body: CreateChatResponse = ApiClient::handle_response(response).await?;
        Ok(body.id)
    }

    /// Load the stored messages of a conversation.
    pub async fn messages(&self, chat_id: &str) -> Result<ChatMessages> {
        let response = self
            .client
            .request(Method::GET, &format!("/chat/{}", path_segment(chat_id)))
            .send()
            .await?;
        ApiClient::handle_response(response).await
    }

    /// Delete a conversation and all of its messages.
    pub async fn delete(&self, chat_id: &str) -> Result<()> {
        let response = self
            .client
            .request(Method::DELETE, &format!("/chat/{}", path_segment(chat_id)))
            .send()
            .await?;
        ApiClient::ensure_success(response).await?;
        Ok(())
    }
}

// =============================================================================
// Auth API
// =============================================================================

/// Auth API client.
#[derive(Debug)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// URL that starts the GitHub OAuth flow.
    pub fn login_url(&self) -> String {
        self.client.url("/auth/github/login")
    }

    /// URL of the backend logout endpoint.
    pub fn logout_url(&self) -> String {
        self.client.url("/auth/logout")
    }

    /// The signed-in user.
    pub async fn me(&self) -> Result<UserProfile> {
        let response = self.client.request(Method::GET, "/auth/me").send().await?;
        ApiClient::handle_response(response).await
    }
}

// =============================================================================
// Health API
// =============================================================================

/// Health API client.
#[derive(Debug)]
pub struct HealthApi<'a> {
    client: &'a ApiClient,
}

impl HealthApi<'_> {
    /// Backend health payload.
    pub async fn check(&self) -> Result<serde_json::Value> {
        let response = self.client.request(Method::GET, "/health").send().await?;
        ApiClient::handle_response(response).await
    }
}
