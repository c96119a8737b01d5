use chrono::Utc;
use sqlx::SqliteConnection;

use super::expect_affected;
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, Page, User, UserChanges};

pub async fn create(conn: &mut SqliteConnection, new: &NewUser) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, full_name, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING *",
    )
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.full_name)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(user)
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("user", id))
}

pub async fn get_by_email(conn: &mut SqliteConnection, email: &str) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("user", email))
}

pub async fn list(conn: &mut SqliteConnection, page: Page) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(conn)
    .await?;
    Ok(users)
}

pub async fn update(conn: &mut SqliteConnection, id: i64, changes: &UserChanges) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        "UPDATE users
         SET email = COALESCE(?, email),
             password_hash = COALESCE(?, password_hash),
             full_name = COALESCE(?, full_name)
         WHERE id = ?
         RETURNING *",
    )
    .bind(&changes.email)
    .bind(&changes.password_hash)
    .bind(&changes.full_name)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::not_found("user", id))
}

/// Removes the user and, by cascade, everything they own.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    expect_affected(result, "user", id)
}
