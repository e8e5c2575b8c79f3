//! Server-rendered inbox and chat pages over the messages API.
//!
//! The chat page embeds the thread as of the request and then refetches it
//! from `/api/messages/{chat_id}` every two seconds.

mod chat;
mod inbox;

use axum::{routing::get, Router};
use time::OffsetDateTime;

use crate::{include_res, messages::ThreadMessage, res::{escape, render}, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(inbox::inbox_page))
        .route("/messages/{username}", get(chat::chat_page))
}

fn clock(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}", at.hour(), at.minute())
}

fn message_html(message: &ThreadMessage, user_id: &str) -> String {
    let side = if message.sender_id.id == user_id { "mine" } else { "theirs" };
    render(
        include_res!(str, "/pages/messages/message.html"),
        &[
            ("id", &*escape(&message.id)),
            ("side", side),
            ("content", &*escape(&message.content)),
            ("time", clock(message.created_at).as_str()),
        ],
    )
}
