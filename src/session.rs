use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::{config::Config, AppError};

pub const USER_ID: &str = "user_id";

pub fn layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.session_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(config.session_inactivity_days)))
}

/// The logged-in user's id. Rejects the request with 401 when the session has none.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(anyhow::anyhow!(msg)))?;

        let Some(user_id) = session.get::<String>(USER_ID).await? else {
            return Err(AppError::unauthorized("Unauthorized: No Token Provided"));
        };

        Ok(CurrentUser(user_id))
    }
}
