use axum::{debug_handler, extract::State, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::info;

use crate::{extract::PathParam, session::CurrentUser, AppError, AppResult};

#[debug_handler]
pub(crate) async fn delete_all(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let deleted = sqlx::query("DELETE FROM notifications WHERE to_id=?")
        .bind(&user_id)
        .execute(&db_pool)
        .await?
        .rows_affected();

    info!("cleared {deleted} notifications of {user_id}");
    Ok(Json(json!({ "message": "Notifications deleted successfully" })))
}

#[debug_handler]
pub(crate) async fn delete_one(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(id): PathParam<String>,
) -> AppResult<Json<Value>> {
    let Some((to_id,)): Option<(String,)> = sqlx::query_as("SELECT to_id FROM notifications WHERE id=?")
        .bind(&id)
        .fetch_optional(&db_pool)
        .await?
    else {
        return Err(AppError::not_found("Notification not found"));
    };

    if to_id != user_id {
        return Err(AppError::forbidden("You are not allowed to delete this notification"));
    }

    sqlx::query("DELETE FROM notifications WHERE id=?")
        .bind(&id)
        .execute(&db_pool)
        .await?;

    Ok(Json(json!({ "message": "Notification deleted successfully" })))
}
