use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;

use crate::{extract::PathParam, session::CurrentUser, AppError, AppResult};

use super::{chat_for, ThreadMessage, ThreadMessageRow, THREAD_MESSAGE_SELECT};

#[debug_handler]
pub(crate) async fn messages(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(chat_id): PathParam<String>,
) -> AppResult<Json<Vec<ThreadMessage>>> {
    if chat_for(&db_pool, &chat_id, &user_id).await?.is_none() {
        return Err(AppError::forbidden("Not authorized to view this chat"));
    }

    Ok(Json(thread(&db_pool, &chat_id).await?))
}

/// A chat's messages in the order they were sent. Callers check membership.
pub(crate) async fn thread(db_pool: &SqlitePool, chat_id: &str) -> AppResult<Vec<ThreadMessage>> {
    let query = format!("{THREAD_MESSAGE_SELECT} WHERE m.chat_id=? ORDER BY m.rowid");
    let rows: Vec<ThreadMessageRow> = sqlx::query_as(&query)
        .bind(chat_id)
        .fetch_all(db_pool)
        .await?;

    Ok(rows.into_iter().map(ThreadMessage::from).collect())
}
