//! Display-ready chat list entries.
//!
//! Chat summaries arrive from the backend already ordered (most recent
//! first). This module never re-sorts them; it only derives what the sidebar
//! shows for each one: a title, a one-line snippet and a relative age.

pub mod relative_time;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::ChatSummary;

pub use relative_time::{Locale, relative_time};

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 48;
/// Maximum snippet length before the ellipsis, in characters.
pub const SNIPPET_MAX_CHARS: usize = 90;
/// Shown when a chat has no message text yet.
pub const NO_RECENT_MESSAGES: &str = "Nenhuma mensagem recente";

/// One row of the chat sidebar.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatEntry {
    pub id: String,
    pub title: String,
    pub snippet: String,
    /// Empty when the timestamp could not be parsed.
    pub relative_time: String,
    pub last_role: Option<String>,
}

/// Title shown for the chat at position `index` (zero-based) of the list.
pub fn derive_title(summary: &ChatSummary, index: usize) -> String {
    if let Some(title) = non_blank(summary.title.as_deref()) {
        return truncate_chars(title, TITLE_MAX_CHARS).to_string();
    }

    match non_blank(summary.preview.as_deref()) {
        Some(preview) => {
            let first_line = preview
                .split(['\n', '\r'])
                .find(|line| !line.is_empty())
                .unwrap_or(preview);
            truncate_chars(first_line, TITLE_MAX_CHARS).to_string()
        }
        None => format!("Conversa {}", index + 1),
    }
}

/// Single-line excerpt of the latest message.
pub fn preview_snippet(preview: Option<&str>) -> String {
    let collapsed = preview
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if collapsed.is_empty() {
        return NO_RECENT_MESSAGES.to_string();
    }

    if collapsed.chars().count() > SNIPPET_MAX_CHARS {
        let cut = truncate_chars(&collapsed, SNIPPET_MAX_CHARS).trim_end();
        format!("{cut}…")
    } else {
        collapsed
    }
}

/// Transform summaries into sidebar entries, keeping their order.
pub fn to_entries(chats: &[ChatSummary], now: DateTime<Utc>, locale: Locale) -> Vec<ChatEntry> {
    chats
        .iter()
        .enumerate()
        .map(|(index, chat)| ChatEntry {
            id: chat.id.clone(),
            title: derive_title(chat, index),
            snippet: preview_snippet(chat.preview.as_deref()),
            relative_time: relative_time(&chat.updated_at, now, locale),
            last_role: chat.last_role.clone(),
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Prefix of `s` holding at most `max` characters.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
