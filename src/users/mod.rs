mod follow;
mod profile;
mod suggested;
mod update;

use axum::{routing::{get, post}, Router};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::{AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{username}", get(profile::profile))
        .route("/suggested", get(suggested::suggested))
        .route("/following/{username}", get(follow::following))
        .route("/followers/{username}", get(follow::followers))
        .route("/follow/{id}", post(follow::follow_unfollow))
        .route("/update", post(update::update_user))
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub profile_img: String,
    pub cover_img: String,
    pub bio: String,
    pub link: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A user as the API returns it, with follow edges rendered as id lists.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub followers: Vec<String>,
    pub following: Vec<String>,
}

/// The handful of user fields embedded in chats, messages and notifications.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub profile_img: String,
}

/// Turns a write that lost a race on the unique email/username columns into
/// the same 400 the up-front checks give.
pub(crate) fn taken_or_internal(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.email") {
                return AppError::bad_request("Email is already taken");
            }
            if message.contains("users.username") {
                return AppError::bad_request("Username is already taken");
            }
        }
    }
    err.into()
}

pub(crate) async fn find_by_id(db_pool: &SqlitePool, id: &str) -> AppResult<Option<User>> {
    Ok(
        sqlx::query_as("SELECT * FROM users WHERE id=?")
            .bind(id)
            .fetch_optional(db_pool)
            .await?
    )
}

pub(crate) async fn find_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    Ok(
        sqlx::query_as("SELECT * FROM users WHERE username=?")
            .bind(username)
            .fetch_optional(db_pool)
            .await?
    )
}

pub(crate) async fn participant(db_pool: &SqlitePool, id: &str) -> AppResult<Option<Participant>> {
    Ok(
        sqlx::query_as("SELECT id,full_name,username,profile_img FROM users WHERE id=?")
            .bind(id)
            .fetch_optional(db_pool)
            .await?
    )
}

pub(crate) async fn with_follows(db_pool: &SqlitePool, user: User) -> AppResult<UserProfile> {
    let followers: Vec<(String,)> = sqlx::query_as("SELECT follower_id FROM follows WHERE followed_id=? ORDER BY rowid")
        .bind(&user.id)
        .fetch_all(db_pool)
        .await?;
    let following: Vec<(String,)> = sqlx::query_as("SELECT followed_id FROM follows WHERE follower_id=? ORDER BY rowid")
        .bind(&user.id)
        .fetch_all(db_pool)
        .await?;

    Ok(UserProfile {
        user,
        followers: followers.into_iter().map(|(id,)| id).collect(),
        following: following.into_iter().map(|(id,)| id).collect(),
    })
}
