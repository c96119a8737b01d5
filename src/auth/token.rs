use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

// Tokens declaring any other algorithm are rejected at validation.
const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Signs and checks bearer tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> AppResult<Self> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|_| AppError::Config("token ttl is out of range".into()))?;
        Ok(TokenKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn issue(&self, user_id: i64) -> AppResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn validate(&self, token: &str) -> AppResult<i64> {
        self.validate_at(token, Utc::now())
    }

    fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(AppError::Token)
    }

    /// Returns the subject id. Expiry is checked here against `now` rather than by
    /// the library so that `now >= exp` is rejected with no leeway.
    fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<i64> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                warn!("Token validation failed: {}", e);
                AppError::Unauthorized("Invalid token")
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            warn!("Token for subject {} expired at {}", claims.sub, claims.exp);
            return Err(AppError::Unauthorized("Token expired"));
        }

        claims.sub.parse().map_err(|_| {
            warn!("Token subject is not a user id: {}", claims.sub);
            AppError::Unauthorized("Invalid token")
        })
    }
}
