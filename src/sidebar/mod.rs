//! Chat-history sidebar.
//!
//! - [`render_sidebar`]: pure HTML rendering of a list of [`ChatEntry`]s
//! - [`controller`]: the stateful wrapper owning the list and handling deletes
//! - [`routes`]: HTMX fragment endpoints

pub mod controller;
pub mod routes;

use std::fmt::Write as _;

use crate::chat_list::ChatEntry;
use crate::endpoints::path_segment;

pub use controller::{
    ChatDeleter, DeleteOutcome, Notification, NotificationKind, SidebarController,
    delete_and_notify,
};

/// DOM id of the sidebar root, targeted by HTMX swaps.
pub const SIDEBAR_ID: &str = "chat-sidebar";

const CHAT_ICON: &str = r#"<svg class="h-4 w-4 shrink-0 text-textMuted" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z"/></svg>"#;
const TRASH_ICON: &str = r#"<svg class="h-4 w-4" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M3 6h18"/><path d="M19 6v14a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V6"/><path d="M8 6V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2"/></svg>"#;

/// Render the sidebar for `entries`, highlighting `active_chat_id`.
///
/// The delete button sits next to the row link rather than inside it, so
/// activating it never navigates to the chat. A successful delete swaps
/// its own row out; a failed one leaves the DOM alone.
pub fn render_sidebar(entries: &[ChatEntry], active_chat_id: Option<&str>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<aside id="{SIDEBAR_ID}" class="flex h-full w-72 flex-col gap-2 border-r border-panelBorder bg-surfaceContainer p-3">"#
    );
    html.push_str(
        r#"<a href="/" class="flex items-center justify-center rounded-xl bg-primary px-3 py-2 text-sm font-medium text-onPrimary hover:opacity-90">Nova conversa</a>"#,
    );

    let active_query = active_chat_id
        .map(|id| format!("?active={}", path_segment(id)))
        .unwrap_or_default();

    // Rows are removed in place by HTMX; the empty state shows once the
    // list has no children left.
    html.push_str(r#"<ul class="peer flex flex-col gap-1 overflow-y-auto">"#);
    for entry in entries {
        let is_active = active_chat_id == Some(entry.id.as_str());
        let row_class = if is_active {
            "bg-surface text-textPrimary"
        } else {
            "text-textSecondary hover:bg-surface hover:text-textPrimary"
        };
        let id = escape_html(&entry.id);
        let segment = path_segment(&entry.id);

        let _ = write!(
            html,
            r#"<li class="group relative rounded-xl {row_class}" data-chat-id="{id}"{current}>"#,
            current = if is_active { r#" aria-current="page""# } else { "" },
        );
        let _ = write!(
            html,
            r#"<a href="/chat/{segment}" class="flex items-start gap-2 px-3 py-2 pr-9">{CHAT_ICON}<span class="flex min-w-0 flex-1 flex-col"><span class="truncate text-sm font-medium">{title}</span>"#,
            title = escape_html(&entry.title),
        );
        if !entry.snippet.is_empty() {
            let _ = write!(
                html,
                r#"<span class="truncate text-xs text-textMuted">{}</span>"#,
                escape_html(&entry.snippet)
            );
        }
        if !entry.relative_time.is_empty() {
            let _ = write!(
                html,
                r#"<time class="text-[11px] text-textMuted">{}</time>"#,
                escape_html(&entry.relative_time)
            );
        }
        html.push_str("</span></a>");
        let _ = write!(
            html,
            r##"<button type="button" class="absolute right-2 top-2 rounded-lg p-1 text-textMuted opacity-0 hover:text-error focus:opacity-100 group-hover:opacity-100 group-focus-within:opacity-100" aria-label="Excluir conversa" hx-delete="/fragments/sidebar/{segment}{active_query}" hx-target="closest li" hx-swap="outerHTML">{TRASH_ICON}</button>"##
        );
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html.push_str(
        r#"<p class="hidden px-2 py-6 text-center text-sm text-textMuted peer-empty:block">Nenhuma conversa ainda. Comece uma nova!</p>"#,
    );
    html.push_str("</aside>");
    html
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
