use axum::{debug_handler, extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{session::CurrentUser, users::{self, Participant}, AppError, AppResult};

use super::{Chat, Message};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InboxEntry {
    #[serde(rename = "_id")]
    pub(crate) id: String,
    pub(crate) participant: Participant,
    pub(crate) last_message: Option<Message>,
    pub(crate) unread_count: i64,
}

#[debug_handler]
pub(crate) async fn chats(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Vec<InboxEntry>>> {
    Ok(Json(inbox(&db_pool, &user_id).await?))
}

/// Every chat of `user_id`, most recent activity first.
pub(crate) async fn inbox(db_pool: &SqlitePool, user_id: &str) -> AppResult<Vec<InboxEntry>> {
    let chats: Vec<Chat> = sqlx::query_as(
        r#"SELECT c.id, c.user_a, c.user_b, c.last_message_id
           FROM chats c LEFT JOIN messages m ON m.id=c.last_message_id
           WHERE c.user_a=? OR c.user_b=?
           ORDER BY m.rowid IS NULL, m.rowid DESC"#,
    )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(db_pool)
        .await?;

    let mut entries = Vec::with_capacity(chats.len());
    for chat in chats {
        let other = chat.other(user_id);
        let Some(participant) = users::participant(db_pool, other).await? else {
            return Err(AppError::Internal(anyhow::anyhow!("chat {} references missing user {other}", chat.id)));
        };

        let last_message: Option<Message> = match &chat.last_message_id {
            Some(message_id) => sqlx::query_as("SELECT * FROM messages WHERE id=?")
                .bind(message_id)
                .fetch_optional(db_pool)
                .await?,
            None => None,
        };

        let (unread_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE chat_id=? AND sender_id<>? AND is_read=0",
        )
            .bind(&chat.id)
            .bind(user_id)
            .fetch_one(db_pool)
            .await?;

        entries.push(InboxEntry {
            id: chat.id,
            participant,
            last_message,
            unread_count,
        });
    }

    Ok(entries)
}
