//! Stateful sidebar: owns the chat list and reconciles deletions locally.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::chat_list::{ChatEntry, Locale, to_entries};
use crate::client::{ApiClient, ChatSummary, ClientError};

use super::render_sidebar;

/// Where the browser goes after the open chat is deleted.
pub const HOME_PATH: &str = "/";

/// Anything that can delete a chat by id.
#[async_trait]
pub trait ChatDeleter: Send + Sync {
    async fn delete_chat(&self, chat_id: &str) -> Result<(), ClientError>;
}

#[async_trait]
impl ChatDeleter for ApiClient {
    async fn delete_chat(&self, chat_id: &str) -> Result<(), ClientError> {
        self.chat().delete(chat_id).await
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient user-visible message (a toast).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Result of a delete attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Whether the chat was removed from the list.
    pub deleted: bool,
    pub notification: Notification,
    /// Set when the open chat was deleted and the view must change.
    pub navigate_to: Option<String>,
}

impl DeleteOutcome {
    /// Nothing changed; tell the user.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            deleted: false,
            notification: Notification::error("Não foi possível excluir a conversa."),
            navigate_to: None,
        }
    }
}

/// Client-side copy of the chat list.
///
/// Built once from a snapshot; afterwards the list only changes through
/// [`SidebarController::delete`], which filters the deleted id out without
/// re-fetching.
#[derive(Debug, Clone)]
pub struct SidebarController {
    chats: Vec<ChatSummary>,
    active_chat_id: Option<String>,
}

impl SidebarController {
    #[must_use]
    pub fn new(snapshot: Vec<ChatSummary>, active_chat_id: Option<String>) -> Self {
        Self {
            chats: snapshot,
            active_chat_id,
        }
    }

    #[must_use]
    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    #[must_use]
    pub fn active_chat_id(&self) -> Option<&str> {
        self.active_chat_id.as_deref()
    }

    #[must_use]
    pub fn entries(&self, now: DateTime<Utc>, locale: Locale) -> Vec<ChatEntry> {
        to_entries(&self.chats, now, locale)
    }

    #[must_use]
    pub fn render(&self, now: DateTime<Utc>, locale: Locale) -> String {
        render_sidebar(&self.entries(now, locale), self.active_chat_id())
    }

    /// Delete `chat_id` through `deleter` and reconcile the local list.
    ///
    /// On failure the list is left exactly as it was and no navigation is
    /// requested.
    pub async fn delete(&mut self, chat_id: &str, deleter: &dyn ChatDeleter) -> DeleteOutcome {
        let outcome = delete_and_notify(deleter, chat_id, self.active_chat_id()).await;
        if outcome.deleted {
            self.chats.retain(|chat| chat.id != chat_id);
            if outcome.navigate_to.is_some() {
                self.active_chat_id = None;
            }
        }
        outcome
    }
}

/// Delete `chat_id` and decide what the view does next.
///
/// Any failure, transport errors included, yields an error notification.
pub async fn delete_and_notify(
    deleter: &dyn ChatDeleter,
    chat_id: &str,
    active_chat_id: Option<&str>,
) -> DeleteOutcome {
    if let Err(e) = deleter.delete_chat(chat_id).await {
        warn!(name: "sidebar.delete.failed", chat_id = %chat_id, error = %e, "Chat delete failed");
        return DeleteOutcome::failed();
    }

    let was_active = active_chat_id == Some(chat_id);
    info!(name: "sidebar.delete.ok", chat_id = %chat_id, was_active, "Chat deleted");
    DeleteOutcome {
        deleted: true,
        notification: Notification::success("Conversa excluída."),
        navigate_to: was_active.then(|| HOME_PATH.to_string()),
    }
}
