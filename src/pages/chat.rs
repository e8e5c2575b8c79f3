use axum::{debug_handler, extract::State, http::StatusCode, response::{Html, IntoResponse, Response}};
use sqlx::SqlitePool;

use crate::{
    extract::PathParam,
    include_res,
    messages,
    res::{self, escape, render},
    session::CurrentUser,
    users,
    AppResult,
};

use super::message_html;

/// The conversation with `username`, whether or not it has started yet.
#[debug_handler]
pub(crate) async fn chat_page(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
    PathParam(username): PathParam<String>,
) -> AppResult<Response> {
    let Some(other) = users::find_by_username(&db_pool, &username).await? else {
        return res::sorry(StatusCode::NOT_FOUND, "User not found");
    };
    if other.id == user_id {
        return res::sorry(StatusCode::BAD_REQUEST, "You can't message yourself");
    }

    let chat_id = messages::chat_between(&db_pool, &user_id, &other.id).await?;
    let mut thread = String::new();
    if let Some(chat_id) = &chat_id {
        for message in messages::thread(&db_pool, chat_id).await? {
            thread += &message_html(&message, &user_id);
        }
    }

    let body = render(
        include_res!(str, "/pages/messages/chat.html"),
        &[
            ("me", &*escape(&user_id)),
            ("chat_id", &*escape(chat_id.as_deref().unwrap_or_default())),
            ("receiver_id", &*escape(&other.id)),
            ("full_name", &*escape(&other.full_name)),
            ("username", &*escape(&other.username)),
            ("messages", thread.as_str()),
        ],
    );

    Ok(Html(body).into_response())
}
