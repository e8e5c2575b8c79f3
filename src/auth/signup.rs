use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::{
    extract::JsonBody,
    session::USER_ID,
    users::{self, UserProfile},
    AppError, AppResult,
};

use super::{is_valid_email, password, required, MIN_PASSWORD_LEN};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupBody {
    full_name: Option<String>,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[debug_handler]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    session: Session,
    JsonBody(body): JsonBody<SignupBody>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let (Some(full_name), Some(username), Some(email), Some(password)) = (
        required(body.full_name),
        required(body.username),
        required(body.email),
        required(body.password),
    ) else {
        return Err(AppError::bad_request("Enter all the fields."));
    };

    if !is_valid_email(&email) {
        return Err(AppError::bad_request("Invalid email format"));
    }

    if sqlx::query("SELECT 1 FROM users WHERE email=?")
        .bind(&email)
        .fetch_optional(&db_pool)
        .await?
        .is_some() {
        return Err(AppError::bad_request("Email is already taken"));
    }

    if users::find_by_username(&db_pool, &username).await?.is_some() {
        return Err(AppError::bad_request("Username is already taken"));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("Password must be at least 6 characters long"));
    }

    let id = Uuid::now_v7().to_string();
    let now = OffsetDateTime::now_utc();
    sqlx::query("INSERT INTO users (id,full_name,username,email,password_hash,created_at,updated_at) VALUES (?,?,?,?,?,?,?)")
        .bind(&id)
        .bind(&full_name)
        .bind(&username)
        .bind(&email)
        .bind(password::hash(&password)?)
        .bind(now)
        .bind(now)
        .execute(&db_pool)
        .await
        .map_err(users::taken_or_internal)?;

    let Some(user) = users::find_by_id(&db_pool, &id).await? else {
        return Err(AppError::Internal(anyhow::anyhow!("user {id} vanished after insert")));
    };

    session.cycle_id().await?;
    session.insert(USER_ID, &id).await?;

    info!("welcome @{username}#{id}");
    Ok((StatusCode::CREATED, Json(users::with_follows(&db_pool, user).await?)))
}
