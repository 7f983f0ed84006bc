//! Exam-prep chat gateway
//!
//! A backend-for-frontend service sitting between the browser and the
//! exam-prep RAG backend. It owns the `access_token` cookie, relays chat
//! traffic (including the Server-Sent Events stream of answers) with that
//! token re-attached as an explicit header, and server-renders the chat
//! history sidebar for an HTMX front end.
//!
//! # Modules
//!
//! - [`endpoints`]: backend base-URL resolution and URL joining
//! - [`client`]: typed backend API client
//! - [`auth`]: access-token cookie bridge
//! - [`proxy`]: streaming and buffered proxy routes
//! - [`chat_list`]: title, snippet and relative-time derivation
//! - [`sidebar`]: sidebar rendering and delete reconciliation
//! - [`pages`]: server-rendered page shell
//! - [`server`]: router and server startup

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod auth;
pub mod chat_list;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod pages;
pub mod proxy;
pub mod server;
pub mod sidebar;
pub mod telemetry;

use std::sync::Arc;

use crate::auth::AccessToken;
use crate::chat_list::Locale;
use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::endpoints::ExecutionContext;
use crate::error::ConfigError;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Global Configuration
    pub config: Arc<AppConfig>,
    /// Outgoing HTTP client. Has no cookie store.
    pub http: reqwest::Client,
    /// Locale for relative-time labels.
    pub locale: Locale,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let locale = Locale::from_tag(&config.locale);
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            locale,
        }
    }

    /// Backend client for a call made from `context`, carrying `token`.
    pub fn api_client(
        &self,
        context: ExecutionContext,
        token: Option<AccessToken>,
    ) -> Result<ApiClient, ConfigError> {
        Ok(ApiClient::for_context(
            &self.config.api,
            context,
            self.config.production,
            self.http.clone(),
        )?
        .with_token(token))
    }
}
