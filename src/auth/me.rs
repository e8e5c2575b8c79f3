use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;

use crate::{session::CurrentUser, users::{self, UserProfile}, AppError, AppResult};

#[debug_handler]
pub(crate) async fn me(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<UserProfile>> {
    let Some(user) = users::find_by_id(&db_pool, &user_id).await? else {
        return Err(AppError::not_found("User not found"));
    };

    Ok(Json(users::with_follows(&db_pool, user).await?))
}
