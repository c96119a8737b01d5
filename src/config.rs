use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

const MIN_SECRET_LEN: usize = 32;

/// Process-wide settings, read once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub pool_size: u32,
    pub db_timeout: Duration,
    pub bcrypt_cost: u32,
    pub server_address: String,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".into()))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| AppError::Config("JWT_SECRET must be set".into()))?
            .into_bytes();
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        Ok(Config {
            database_url,
            jwt_secret,
            token_ttl: Duration::from_secs(parse_or(&lookup, "TOKEN_TTL_SECS", 24 * 60 * 60)?),
            pool_size: parse_or(&lookup, "DB_POOL_SIZE", 5)?,
            db_timeout: Duration::from_secs(parse_or(&lookup, "DB_TIMEOUT_SECS", 10)?),
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            server_address: lookup("SERVER_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".into()),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> AppResult<T> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
