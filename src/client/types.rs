//! Wire types of the backend API.

use serde::{Deserialize, Serialize};

/// Lightweight conversation record used to render chat lists.
///
/// The backend speaks `snake_case`; the camelCase aliases accept payloads
/// produced by JavaScript clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSummary {
    /// Server-assigned conversation id, unique per user.
    pub id: String,
    /// Backend-generated title, if one has been assigned yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Excerpt of the latest message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Who sent the latest message.
    #[serde(default, alias = "lastRole", skip_serializing_if = "Option::is_none")]
    pub last_role: Option<String>,
    /// ISO-8601 timestamp of the latest update.
    #[serde(alias = "updatedAt")]
    pub updated_at: String,
}

/// `GET /chat` response.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListChatsResponse {
    pub chats: Vec<ChatSummary>,
}

/// `POST /chat/create` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatResponse {
    pub id: String,
}

/// `GET /chat/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessages {
    pub id: String,
    pub messages: Vec<StoredMessage>,
}

/// A persisted UI message: a role plus typed parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: String,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl StoredMessage {
    /// Concatenated text of all `text` parts.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `GET /auth/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: serde_json::Value,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
