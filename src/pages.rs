//! Server-rendered pages.
//!
//! Pages are the server-side parent of the sidebar: they fetch the initial
//! chat list once and hand it to the sidebar as a snapshot.

use std::fmt::Write as _;

use axum::{
    extract::{Path, State},
    http::HeaderValue,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::warn;

use crate::AppState;
use crate::auth::AccessToken;
use crate::client::{ClientError, StoredMessage};
use crate::endpoints::{ExecutionContext, path_segment};
use crate::error::GatewayError;
use crate::sidebar::{escape_html, routes::load_controller};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/api/login";

/// GET / - New conversation view.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    chat_page(&state, &jar, None).await
}

/// GET /chat/{id} - An existing conversation.
pub async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(chat_id): Path<String>,
) -> Response {
    chat_page(&state, &jar, Some(chat_id)).await
}

async fn chat_page(state: &AppState, jar: &CookieJar, chat_id: Option<String>) -> Response {
    let Some(token) = AccessToken::from_jar(jar) else {
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let controller = match load_controller(state, Some(token), chat_id.clone()).await {
        Ok(controller) => controller,
        Err(GatewayError::Backend { status, .. }) if status.as_u16() == 401 => {
            return Redirect::to(LOGIN_PATH).into_response();
        }
        Err(e) => return e.into_response(),
    };

    let sidebar = controller.render(Utc::now(), state.locale);
    let content = chat_panel(chat_id.as_deref());
    Html(html_shell("Assistente de Vestibular", &sidebar, &content)).into_response()
}

fn chat_panel(chat_id: Option<&str>) -> String {
    let chat_attr = chat_id
        .map(|id| format!(r#" data-chat-id="{}""#, escape_html(id)))
        .unwrap_or_default();
    format!(
        r#"<section id="chat" class="flex h-full flex-1 flex-col"{chat_attr} data-stream-endpoint="/api/chat">
    <div id="chat-messages" class="flex flex-1 flex-col gap-3 overflow-y-auto p-6" hx-get="{messages}" hx-trigger="{trigger}"></div>
    <form id="chat-form" class="flex gap-2 border-t border-panelBorder p-4">
        <textarea name="message" rows="1" class="flex-1 resize-none rounded-xl bg-surface px-3 py-2" placeholder="Pergunte sobre o vestibular..."></textarea>
        <button type="submit" class="rounded-xl bg-primary px-4 py-2 text-onPrimary">Enviar</button>
    </form>
</section>"#,
        messages = chat_id
            .map(|id| format!("/fragments/chat/{}", escape_html(&path_segment(id))))
            .unwrap_or_default(),
        trigger = if chat_id.is_some() { "load" } else { "none" },
    )
}

/// GET /fragments/chat/{id} - Stored messages of a conversation as HTML.
pub async fn chat_messages_fragment(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(chat_id): Path<String>,
) -> Response {
    let Some(token) = AccessToken::from_jar(&jar) else {
        return hx_redirect(LOGIN_PATH);
    };

    let result = match state.api_client(ExecutionContext::Server, Some(token)) {
        Ok(client) => client.chat().messages(&chat_id).await,
        Err(e) => Err(ClientError::Config(e)),
    };

    match result {
        Ok(history) => Html(render_messages(&history.messages)).into_response(),
        Err(ClientError::Api { status: 401, .. }) => hx_redirect(LOGIN_PATH),
        Err(e) => {
            warn!(name: "chat.messages.failed", chat_id = %chat_id, error = %e, "Could not load messages");
            Html(
                r#"<p class="py-6 text-center text-sm text-error">Não foi possível carregar as mensagens.</p>"#
                    .to_string(),
            )
            .into_response()
        }
    }
}

fn hx_redirect(location: &'static str) -> Response {
    let mut response = Html(String::new()).into_response();
    response
        .headers_mut()
        .insert("HX-Redirect", HeaderValue::from_static(location));
    response
}

/// Render stored messages as chat bubbles, skipping ones without text.
fn render_messages(messages: &[StoredMessage]) -> String {
    let mut html = String::new();
    for message in messages {
        let text = message.text();
        if text.trim().is_empty() {
            continue;
        }
        let align = if message.role == "user" {
            "self-end bg-primary text-onPrimary"
        } else {
            "self-start bg-surface text-textPrimary"
        };
        let _ = write!(
            html,
            r#"<article class="max-w-[80%] rounded-2xl px-4 py-2 {align}" data-role="{role}"><p class="whitespace-pre-wrap">{text}</p></article>"#,
            role = escape_html(&message.role),
            text = escape_html(&text),
        );
    }
    html
}

/// Generate the HTML shell for the application.
fn html_shell(title: &str, sidebar: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR" class="dark">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <script type="module" src="/static/main.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="h-screen overflow-hidden bg-background text-textPrimary antialiased">
    <div id="app-shell" class="flex h-full">
        {sidebar}
        <main id="app" class="flex flex-1 flex-col">
            {content}
        </main>
    </div>
    <div id="toasts" class="fixed bottom-4 right-4 flex flex-col gap-2"></div>
</body>
</html>"#,
        title = escape_html(title),
    )
}
