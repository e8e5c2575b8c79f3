use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{debug, info};

use crate::{extract::JsonBody, session::USER_ID, users::{self, UserProfile}, AppError, AppResult};

use super::{password, required, Credentials};

#[debug_handler]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    JsonBody(Credentials { username, password }): JsonBody<Credentials>,
) -> AppResult<Json<UserProfile>> {
    let (Some(username), Some(password)) = (required(username), required(password)) else {
        return Err(AppError::bad_request("Enter all the fields."));
    };

    let user = users::find_by_username(&db_pool, &username).await?;
    let Some(user) = user.filter(|user| password::verify(&password, &user.password_hash)) else {
        debug!("failed login for @{username}");
        return Err(AppError::bad_request("Invalid username or password"));
    };

    session.cycle_id().await?;
    session.insert(USER_ID, &user.id).await?;

    info!("welcome back @{}#{}", user.username, user.id);
    Ok(Json(users::with_follows(&db_pool, user).await?))
}
