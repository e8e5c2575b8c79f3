mod login;
mod logout;
mod me;
pub(crate) mod password;
mod signup;

use std::sync::LazyLock;

use axum::{routing::{get, post}, Router};
use regex::Regex;
use serde::Deserialize;

use crate::AppState;

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/me", get(me::me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Treats absent and blank form fields the same way.
pub(crate) fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Credentials {
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
}
