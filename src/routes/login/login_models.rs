use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::routes::validation;

// Signup request and response
#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl SignupRequest {
    /// Normalised email and full name; the password is only checked, never stored.
    pub fn validate(&self) -> AppResult<(String, Option<String>)> {
        let email = validation::email(&self.email)?;
        validation::password(&self.password)?;
        Ok((email, validation::optional(self.full_name.clone())))
    }
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: i64,
    pub email: String,
}


// Login request and response
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}


// Home response for callers without a valid token
#[derive(Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
}
