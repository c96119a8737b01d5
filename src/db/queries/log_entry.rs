use chrono::Utc;
use sqlx::SqliteConnection;

use super::expect_affected;
use crate::errors::{AppError, AppResult};
use crate::models::{LogChanges, LogEntry, NewLogEntry, Page};

pub async fn create(conn: &mut SqliteConnection, new: &NewLogEntry) -> AppResult<LogEntry> {
    let entry = sqlx::query_as::<_, LogEntry>(
        "INSERT INTO logs (user_id, project_id, action, details, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.project_id)
    .bind(&new.action)
    .bind(&new.details)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(entry)
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<LogEntry> {
    sqlx::query_as::<_, LogEntry>("SELECT * FROM logs WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("log", id))
}

pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    user_id: i64,
    page: Page,
) -> AppResult<Vec<LogEntry>> {
    let entries = sqlx::query_as::<_, LogEntry>(
        "SELECT * FROM logs
         WHERE user_id = ?
         ORDER BY created_at ASC, id ASC
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(conn)
    .await?;
    Ok(entries)
}

pub async fn list_by_project(
    conn: &mut SqliteConnection,
    project_id: i64,
    page: Page,
) -> AppResult<Vec<LogEntry>> {
    let entries = sqlx::query_as::<_, LogEntry>(
        "SELECT * FROM logs
         WHERE project_id = ?
         ORDER BY created_at ASC, id ASC
         LIMIT ? OFFSET ?",
    )
    .bind(project_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(conn)
    .await?;
    Ok(entries)
}

/// Entries written against `project_id` or by `user_id`.
pub async fn list_by_project_or_user(
    conn: &mut SqliteConnection,
    project_id: i64,
    user_id: i64,
) -> AppResult<Vec<LogEntry>> {
    let entries = sqlx::query_as::<_, LogEntry>(
        "SELECT * FROM logs
         WHERE project_id = ? OR user_id = ?
         ORDER BY created_at ASC, id ASC",
    )
    .bind(project_id)
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(entries)
}

pub async fn update(conn: &mut SqliteConnection, id: i64, changes: &LogChanges) -> AppResult<LogEntry> {
    sqlx::query_as::<_, LogEntry>(
        "UPDATE logs
         SET action = COALESCE(?, action),
             details = COALESCE(?, details)
         WHERE id = ?
         RETURNING *",
    )
    .bind(&changes.action)
    .bind(&changes.details)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::not_found("log", id))
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM logs WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    expect_affected(result, "log", id)
}
