use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    extract::{JsonBody, PathParam},
    notifications::{self, NotificationKind},
    session::CurrentUser,
    users,
    AppError, AppResult,
};

use super::{ordered_pair, thread_message, ThreadMessage};

#[derive(Debug, Deserialize)]
pub(crate) struct SendMessageBody {
    content: Option<String>,
}

#[debug_handler]
pub(crate) async fn send_message(
    CurrentUser(sender_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(receiver_id): PathParam<String>,
    JsonBody(SendMessageBody { content }): JsonBody<SendMessageBody>,
) -> AppResult<(StatusCode, Json<ThreadMessage>)> {
    let content = content.as_deref().map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(AppError::bad_request("Message content is required"));
    }

    if receiver_id == sender_id {
        return Err(AppError::bad_request("You can't send a message to yourself"));
    }
    if users::find_by_id(&db_pool, &receiver_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let (user_a, user_b) = ordered_pair(&sender_id, &receiver_id);
    let now = OffsetDateTime::now_utc();
    let message_id = Uuid::now_v7().to_string();

    let mut tx = db_pool.begin().await?;

    let created = sqlx::query(
        "INSERT INTO chats (id,user_a,user_b,created_at) VALUES (?,?,?,?) ON CONFLICT (user_a,user_b) DO NOTHING",
    )
        .bind(Uuid::now_v7().to_string())
        .bind(user_a)
        .bind(user_b)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let (chat_id,): (String,) = sqlx::query_as("SELECT id FROM chats WHERE user_a=? AND user_b=?")
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&mut *tx)
        .await?;
    if created > 0 {
        debug!("opened chat {chat_id} between {user_a} and {user_b}");
    }

    sqlx::query("INSERT INTO messages (id,chat_id,sender_id,content,created_at) VALUES (?,?,?,?,?)")
        .bind(&message_id)
        .bind(&chat_id)
        .bind(&sender_id)
        .bind(content)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE chats SET last_message_id=?,last_message_time=? WHERE id=?")
        .bind(&message_id)
        .bind(now)
        .bind(&chat_id)
        .execute(&mut *tx)
        .await?;

    notifications::notify(&mut *tx, NotificationKind::Message, &sender_id, &receiver_id).await?;

    tx.commit().await?;

    let Some(message) = thread_message(&db_pool, &message_id).await? else {
        return Err(AppError::Internal(anyhow::anyhow!("message {message_id} vanished after insert")));
    };

    info!("{sender_id} -> {receiver_id} in chat {chat_id}");
    Ok((StatusCode::CREATED, Json(message)))
}
