use axum::{debug_handler, extract::State, response::Html};
use sqlx::SqlitePool;

use crate::{include_res, messages, res::{escape, render}, session::CurrentUser, AppResult};

#[debug_handler]
pub(crate) async fn inbox_page(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Html<String>> {
    let entries = messages::inbox(&db_pool, &user_id).await?;

    let mut chat_items = String::new();
    for entry in &entries {
        let preview = entry
            .last_message
            .as_ref()
            .map(|message| message.content.as_str())
            .unwrap_or("No messages yet");
        let unread = if entry.unread_count > 0 { entry.unread_count.to_string() } else { String::new() };

        chat_items += &render(
            include_res!(str, "/pages/messages/chat_item.html"),
            &[
                ("username", &*escape(&entry.participant.username)),
                ("full_name", &*escape(&entry.participant.full_name)),
                ("preview", &*escape(preview)),
                ("unread", unread.as_str()),
            ],
        );
    }

    if entries.is_empty() {
        chat_items = include_res!(str, "/pages/messages/no_chats.html").to_owned();
    }

    Ok(Html(render(include_res!(str, "/pages/messages/inbox.html"), &[("chat_items", chat_items.as_str())])))
}
