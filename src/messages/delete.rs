use axum::{debug_handler, extract::State, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::info;

use crate::{extract::PathParam, session::CurrentUser, AppError, AppResult};

#[debug_handler]
pub(crate) async fn delete_message(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(message_id): PathParam<String>,
) -> AppResult<Json<Value>> {
    let Some((chat_id, sender_id)): Option<(String, String)> =
        sqlx::query_as("SELECT chat_id,sender_id FROM messages WHERE id=?")
            .bind(&message_id)
            .fetch_optional(&db_pool)
            .await?
    else {
        return Err(AppError::not_found("Message not found"));
    };

    if sender_id != user_id {
        return Err(AppError::forbidden("Not authorized to delete this message"));
    }

    let mut tx = db_pool.begin().await?;

    sqlx::query("DELETE FROM messages WHERE id=?")
        .bind(&message_id)
        .execute(&mut *tx)
        .await?;

    // the chat keeps pointing at whatever is now its newest message
    sqlx::query(
        r#"UPDATE chats SET
               last_message_id=(SELECT id FROM messages WHERE chat_id=? ORDER BY rowid DESC LIMIT 1),
               last_message_time=(SELECT created_at FROM messages WHERE chat_id=? ORDER BY rowid DESC LIMIT 1)
           WHERE id=? AND (last_message_id IS NULL OR last_message_id=?)"#,
    )
        .bind(&chat_id)
        .bind(&chat_id)
        .bind(&chat_id)
        .bind(&message_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("{user_id} deleted message {message_id} from chat {chat_id}");
    Ok(Json(json!({ "message": "Message deleted successfully" })))
}
