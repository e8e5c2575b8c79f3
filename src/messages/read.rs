use axum::{debug_handler, extract::State, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::debug;

use crate::{extract::PathParam, session::CurrentUser, AppError, AppResult};

use super::chat_for;

/// Marks the other participant's messages as read. Never clears a read flag.
#[debug_handler]
pub(crate) async fn mark_as_read(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(chat_id): PathParam<String>,
) -> AppResult<Json<Value>> {
    if chat_for(&db_pool, &chat_id, &user_id).await?.is_none() {
        return Err(AppError::forbidden("Not authorized"));
    }

    let marked = sqlx::query("UPDATE messages SET is_read=1 WHERE chat_id=? AND sender_id<>? AND is_read=0")
        .bind(&chat_id)
        .bind(&user_id)
        .execute(&db_pool)
        .await?
        .rows_affected();

    debug!("{user_id} read {marked} messages in chat {chat_id}");
    Ok(Json(json!({ "message": "Messages marked as read" })))
}
