use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::{auth, pages, proxy, sidebar};

/// Build the gateway router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/chat/{id}", get(pages::chat))
        // Auth bridge
        .route("/api/set-cookie-client", get(auth::routes::set_cookie_client))
        .route("/api/login", get(auth::routes::login))
        .route("/api/logout", get(auth::routes::logout))
        // Backend proxies
        .route(
            "/api/chat",
            post(proxy::sse::chat_send).get(proxy::rest::list_chats),
        )
        .route("/api/chat/create", post(proxy::rest::create_chat))
        .route(
            "/api/chat/{id}",
            get(proxy::rest::chat_messages).delete(proxy::rest::delete_chat),
        )
        .route("/api/me", get(proxy::rest::me))
        // HTMX fragments
        .route("/fragments/sidebar", get(sidebar::routes::sidebar_fragment))
        .route(
            "/fragments/sidebar/{id}",
            delete(sidebar::routes::delete_from_sidebar),
        )
        .route("/fragments/chat/{id}", get(pages::chat_messages_fragment))
        .route("/healthz", get(|| async { "ok" }))
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided state.
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );

    match state.config.api.proxy_base() {
        Some(base) => info!(
            name: "backend.config.loaded",
            base_url = %base,
            production = state.config.production,
            "Backend configuration loaded"
        ),
        None => tracing::warn!(
            name: "backend.config.missing",
            "No backend URL configured; proxy routes will answer 500"
        ),
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!(name: "server.shutdown", "Shutdown signal received");
}
