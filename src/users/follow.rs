use axum::{debug_handler, extract::State, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::info;

use crate::{
    extract::PathParam,
    notifications::{self, NotificationKind},
    session::CurrentUser,
    AppError, AppResult,
};

use super::{find_by_id, find_by_username, with_follows, User, UserProfile};

#[debug_handler]
pub(crate) async fn following(
    _: CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(username): PathParam<String>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let Some(user) = find_by_username(&db_pool, &username).await? else {
        return Err(AppError::not_found("User not found"));
    };

    let users: Vec<User> = sqlx::query_as(
        "SELECT u.* FROM follows f JOIN users u ON u.id=f.followed_id WHERE f.follower_id=? ORDER BY f.rowid",
    )
        .bind(&user.id)
        .fetch_all(&db_pool)
        .await?;

    profiles(&db_pool, users).await
}

#[debug_handler]
pub(crate) async fn followers(
    _: CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(username): PathParam<String>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let Some(user) = find_by_username(&db_pool, &username).await? else {
        return Err(AppError::not_found("User not found"));
    };

    let users: Vec<User> = sqlx::query_as(
        "SELECT u.* FROM follows f JOIN users u ON u.id=f.follower_id WHERE f.followed_id=? ORDER BY f.rowid",
    )
        .bind(&user.id)
        .fetch_all(&db_pool)
        .await?;

    profiles(&db_pool, users).await
}

async fn profiles(db_pool: &SqlitePool, users: Vec<User>) -> AppResult<Json<Vec<UserProfile>>> {
    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        profiles.push(with_follows(db_pool, user).await?);
    }
    Ok(Json(profiles))
}

#[debug_handler]
pub(crate) async fn follow_unfollow(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(target_id): PathParam<String>,
) -> AppResult<Json<Value>> {
    if target_id == user_id {
        return Err(AppError::bad_request("You can't follow/unfollow yourself"));
    }

    if find_by_id(&db_pool, &target_id).await?.is_none() || find_by_id(&db_pool, &user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let mut tx = db_pool.begin().await?;

    let removed = sqlx::query("DELETE FROM follows WHERE follower_id=? AND followed_id=?")
        .bind(&user_id)
        .bind(&target_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed > 0 {
        tx.commit().await?;
        info!("{user_id} unfollowed {target_id}");
        return Ok(Json(json!({ "message": "User unfollowed successfully" })));
    }

    sqlx::query("INSERT INTO follows (follower_id,followed_id,created_at) VALUES (?,?,?)")
        .bind(&user_id)
        .bind(&target_id)
        .bind(OffsetDateTime::now_utc())
        .execute(&mut *tx)
        .await?;
    notifications::notify(&mut *tx, NotificationKind::Follow, &user_id, &target_id).await?;
    tx.commit().await?;

    info!("{user_id} followed {target_id}");
    Ok(Json(json!({ "message": "User followed successfully" })))
}
