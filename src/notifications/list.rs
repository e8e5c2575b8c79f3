use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;

use crate::{session::CurrentUser, AppResult};

use super::{Notification, NotificationRow};

/// Returns the caller's notifications newest first, then marks the returned ones read.
#[debug_handler]
pub(crate) async fn notifications(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Vec<Notification>>> {
    let rows: Vec<NotificationRow> = sqlx::query_as(
        r#"SELECT n.rowid AS seq, n.id, n.kind, n.to_id, n.read, n.created_at,
                  u.id AS from_id, u.username AS from_username, u.profile_img AS from_profile_img
           FROM notifications n JOIN users u ON u.id=n.from_id
           WHERE n.to_id=?
           ORDER BY n.rowid DESC"#,
    )
        .bind(&user_id)
        .fetch_all(&db_pool)
        .await?;

    // only what was just returned; anything newer stays unread for the next listing
    if let Some(newest) = rows.first() {
        sqlx::query("UPDATE notifications SET read=1 WHERE to_id=? AND read=0 AND rowid<=?")
            .bind(&user_id)
            .bind(newest.seq)
            .execute(&db_pool)
            .await?;
    }

    Ok(Json(rows.into_iter().map(Notification::from).collect()))
}
