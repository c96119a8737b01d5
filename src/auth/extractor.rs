use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::{error, info};

use super::token::TokenKeys;
use crate::errors::{AppError, AppResult};

/// Subject id of a request carrying a valid bearer token.
///
/// Handlers that take this as an argument never run for unauthenticated
/// requests; the extractor answers 401 on their behalf.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

/// The token part of an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    let keys = req.app_data::<web::Data<TokenKeys>>().ok_or_else(|| {
        error!("Token keys are not registered as app data");
        AppError::Config("token keys not configured".into())
    })?;

    let token = match bearer_token(req) {
        Some(token) => token,
        None => {
            info!("Missing or malformed Authorization header on {}", req.path());
            return Err(AppError::Unauthorized("Missing bearer token"));
        }
    };

    let user_id = keys.validate(token)?;
    Ok(AuthenticatedUser { user_id })
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
