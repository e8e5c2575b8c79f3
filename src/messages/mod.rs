//! Direct messages between two users.
//!
//! A chat is created lazily by the first message between a pair of users and
//! keeps a pointer to its latest message so the inbox can sort by recency.
//! Clients poll; nothing here pushes.

mod chats;
mod delete;
mod read;
mod send;
mod thread;

pub(crate) use chats::{inbox, InboxEntry};
pub(crate) use thread::thread;

use axum::{routing::{get, post, put}, Router};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::{users::Participant, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chats", get(chats::chats))
        .route("/{id}", get(thread::messages).delete(delete::delete_message))
        .route("/send/{receiver_id}", post(send::send_message))
        .route("/read/{chat_id}", put(read::mark_as_read))
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Chat {
    pub(crate) id: String,
    pub(crate) user_a: String,
    pub(crate) user_b: String,
    pub(crate) last_message_id: Option<String>,
}

impl Chat {
    pub(crate) fn other(&self, user_id: &str) -> &str {
        if self.user_a == user_id { &self.user_b } else { &self.user_a }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A message with its sender expanded, as threads return them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub chat_id: String,
    pub sender_id: Participant,
    pub content: String,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
struct ThreadMessageRow {
    id: String,
    chat_id: String,
    content: String,
    is_read: bool,
    created_at: OffsetDateTime,
    sender_id: String,
    sender_full_name: String,
    sender_username: String,
    sender_profile_img: String,
}

impl From<ThreadMessageRow> for ThreadMessage {
    fn from(row: ThreadMessageRow) -> Self {
        Self {
            id: row.id,
            chat_id: row.chat_id,
            sender_id: Participant {
                id: row.sender_id,
                full_name: row.sender_full_name,
                username: row.sender_username,
                profile_img: row.sender_profile_img,
            },
            content: row.content,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

const THREAD_MESSAGE_SELECT: &str = r#"
SELECT m.id, m.chat_id, m.content, m.is_read, m.created_at,
       u.id AS sender_id, u.full_name AS sender_full_name,
       u.username AS sender_username, u.profile_img AS sender_profile_img
FROM messages m JOIN users u ON u.id=m.sender_id"#;

/// Orders a pair of user ids the way the chats table stores them.
pub(crate) fn ordered_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Looks up a chat only if `user_id` takes part in it.
pub(crate) async fn chat_for(db_pool: &SqlitePool, chat_id: &str, user_id: &str) -> AppResult<Option<Chat>> {
    Ok(
        sqlx::query_as("SELECT id,user_a,user_b,last_message_id FROM chats WHERE id=? AND (user_a=? OR user_b=?)")
            .bind(chat_id)
            .bind(user_id)
            .bind(user_id)
            .fetch_optional(db_pool)
            .await?
    )
}

/// The chat between two users, if they have exchanged a message.
pub(crate) async fn chat_between(db_pool: &SqlitePool, a: &str, b: &str) -> AppResult<Option<String>> {
    let (user_a, user_b) = ordered_pair(a, b);
    let chat: Option<(String,)> = sqlx::query_as("SELECT id FROM chats WHERE user_a=? AND user_b=?")
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(db_pool)
        .await?;
    Ok(chat.map(|(id,)| id))
}

pub(crate) async fn thread_message(db_pool: &SqlitePool, message_id: &str) -> AppResult<Option<ThreadMessage>> {
    let query = format!("{THREAD_MESSAGE_SELECT} WHERE m.id=?");
    let row: Option<ThreadMessageRow> = sqlx::query_as(&query)
        .bind(message_id)
        .fetch_optional(db_pool)
        .await?;
    Ok(row.map(ThreadMessage::from))
}
