use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;

use crate::{extract::PathParam, session::CurrentUser, AppError, AppResult};

use super::{find_by_username, with_follows, UserProfile};

#[debug_handler]
pub(crate) async fn profile(
    _: CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(username): PathParam<String>,
) -> AppResult<Json<UserProfile>> {
    let Some(user) = find_by_username(&db_pool, &username).await? else {
        return Err(AppError::not_found("User not found"));
    };

    Ok(Json(with_follows(&db_pool, user).await?))
}
