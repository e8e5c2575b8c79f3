use std::{env, fmt::Display, str::FromStr};

use anyhow::anyhow;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_secure: bool,
    pub session_inactivity_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: "sqlite://chirp.db?mode=rwc".to_owned(),
            db_max_connections: 16,
            session_secure: false,
            session_inactivity_days: 15,
        }
    }
}

impl Config {
    /// Reads the environment (and a `.env` file, if present) on top of the defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            port: try_load("PORT", defaults.port)?,
            database_url: try_load("DATABASE_URL", defaults.database_url)?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            session_secure: try_load("SESSION_SECURE", defaults.session_secure)?,
            session_inactivity_days: try_load("SESSION_INACTIVITY_DAYS", defaults.session_inactivity_days)?,
        })
    }
}

fn try_load<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("environment misconfigured: {key}={raw:?} ({e})")
    })
}
