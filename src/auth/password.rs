use std::sync::OnceLock;

use bcrypt::{hash, verify};
use tokio::task::spawn_blocking;

use crate::errors::AppResult;

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Salted bcrypt hash of `password` at the given cost, computed off the
/// async workers.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_owned();
    Ok(spawn_blocking(move || hash(password, cost)).await??)
}

/// `Ok(false)` on mismatch; errors only when `password_hash` is not a bcrypt hash.
pub async fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    Ok(spawn_blocking(move || verify(password, &password_hash)).await??)
}

/// Hash checked when a login names no known user, so that path costs the
/// same as a wrong password. Computed once per process.
pub async fn dummy_hash(cost: u32) -> AppResult<&'static str> {
    if let Some(existing) = DUMMY_HASH.get() {
        return Ok(existing);
    }
    let fresh = hash_password("no such user", cost).await?;
    Ok(DUMMY_HASH.get_or_init(|| fresh))
}
