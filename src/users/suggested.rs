use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;

use crate::{session::CurrentUser, AppResult};

use super::{with_follows, User, UserProfile};

const SUGGESTED_LIMIT: i64 = 4;

#[debug_handler]
pub(crate) async fn suggested(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let picked: Vec<User> = sqlx::query_as(
        r#"SELECT * FROM users
           WHERE id<>? AND id NOT IN (SELECT followed_id FROM follows WHERE follower_id=?)
           ORDER BY RANDOM() LIMIT ?"#,
    )
        .bind(&user_id)
        .bind(&user_id)
        .bind(SUGGESTED_LIMIT)
        .fetch_all(&db_pool)
        .await?;

    let mut suggested = Vec::with_capacity(picked.len());
    for user in picked {
        suggested.push(with_follows(&db_pool, user).await?);
    }

    Ok(Json(suggested))
}
