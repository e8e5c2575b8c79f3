use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::info;

use crate::{auth::{self, password, required}, extract::JsonBody, session::CurrentUser, AppError, AppResult};

use super::{find_by_id, taken_or_internal, with_follows, UserProfile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateUserBody {
    full_name: Option<String>,
    email: Option<String>,
    username: Option<String>,
    current_password: Option<String>,
    new_password: Option<String>,
    bio: Option<String>,
    link: Option<String>,
    profile_img: Option<String>,
    cover_img: Option<String>,
}

#[debug_handler]
pub(crate) async fn update_user(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    JsonBody(body): JsonBody<UpdateUserBody>,
) -> AppResult<Json<UserProfile>> {
    let Some(mut user) = find_by_id(&db_pool, &user_id).await? else {
        return Err(AppError::not_found("User not found"));
    };

    match (required(body.current_password), required(body.new_password)) {
        (None, None) => {}
        (Some(current), Some(new)) => {
            if !password::verify(&current, &user.password_hash) {
                return Err(AppError::bad_request("Current password is incorrect"));
            }
            if new.chars().count() < auth::MIN_PASSWORD_LEN {
                return Err(AppError::bad_request("Password must be at least 6 characters long"));
            }
            user.password_hash = password::hash(&new)?;
        }
        _ => {
            return Err(AppError::bad_request("Please provide both current password and new password"));
        }
    }

    if let Some(email) = required(body.email) {
        if !auth::is_valid_email(&email) {
            return Err(AppError::bad_request("Invalid email format"));
        }
        if taken(&db_pool, "email", &email, &user_id).await? {
            return Err(AppError::bad_request("Email is already taken"));
        }
        user.email = email;
    }

    if let Some(username) = required(body.username) {
        if taken(&db_pool, "username", &username, &user_id).await? {
            return Err(AppError::bad_request("Username is already taken"));
        }
        user.username = username;
    }

    if let Some(full_name) = required(body.full_name) {
        user.full_name = full_name;
    }
    user.bio = body.bio.unwrap_or(user.bio);
    user.link = body.link.unwrap_or(user.link);
    user.profile_img = required(body.profile_img).unwrap_or(user.profile_img);
    user.cover_img = required(body.cover_img).unwrap_or(user.cover_img);
    user.updated_at = OffsetDateTime::now_utc();

    sqlx::query(
        "UPDATE users SET full_name=?,username=?,email=?,password_hash=?,profile_img=?,cover_img=?,bio=?,link=?,updated_at=? WHERE id=?",
    )
        .bind(&user.full_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.profile_img)
        .bind(&user.cover_img)
        .bind(&user.bio)
        .bind(&user.link)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(&db_pool)
        .await
        .map_err(taken_or_internal)?;

    info!("updated profile of @{}", user.username);
    Ok(Json(with_follows(&db_pool, user).await?))
}

async fn taken(db_pool: &SqlitePool, column: &'static str, value: &str, user_id: &str) -> AppResult<bool> {
    let query = format!("SELECT 1 FROM users WHERE {column}=? AND id<>?");
    Ok(
        sqlx::query(&query)
            .bind(value)
            .bind(user_id)
            .fetch_optional(db_pool)
            .await?
            .is_some()
    )
}
