mod list;
mod remove;

use axum::{routing::{delete, get}, Router};
use serde::Serialize;
use sqlx::{sqlite::SqliteExecutor, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::notifications).delete(remove::delete_all))
        .route("/{id}", delete(remove::delete_one))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Message,
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    seq: i64,
    id: String,
    kind: NotificationKind,
    to_id: String,
    read: bool,
    created_at: OffsetDateTime,
    from_id: String,
    from_username: String,
    from_profile_img: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSource {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub profile_img: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub from: NotificationSource,
    pub to: String,
    pub read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            from: NotificationSource {
                id: row.from_id,
                username: row.from_username,
                profile_img: row.from_profile_img,
            },
            to: row.to_id,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

/// Records that `from` did something `to` should hear about.
pub(crate) async fn notify<'e, E>(executor: E, kind: NotificationKind, from: &str, to: &str) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("INSERT INTO notifications (id,kind,from_id,to_id,created_at) VALUES (?,?,?,?,?)")
        .bind(Uuid::now_v7().to_string())
        .bind(kind)
        .bind(from)
        .bind(to)
        .bind(OffsetDateTime::now_utc())
        .execute(executor)
        .await?;
    Ok(())
}
