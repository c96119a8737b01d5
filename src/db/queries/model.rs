use chrono::Utc;
use sqlx::SqliteConnection;

use super::expect_affected;
use crate::errors::{AppError, AppResult};
use crate::models::{Model, ModelChanges, NewModel, Page};

pub async fn create(conn: &mut SqliteConnection, new: &NewModel) -> AppResult<Model> {
    let model = sqlx::query_as::<_, Model>(
        "INSERT INTO models (user_id, name, description, file_path, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.file_path)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(model)
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Model> {
    sqlx::query_as::<_, Model>("SELECT * FROM models WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("model", id))
}

pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    user_id: i64,
    page: Page,
) -> AppResult<Vec<Model>> {
    let models = sqlx::query_as::<_, Model>(
        "SELECT * FROM models
         WHERE user_id = ?
         ORDER BY created_at ASC, id ASC
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(conn)
    .await?;
    Ok(models)
}

pub async fn list_by_project(conn: &mut SqliteConnection, project_id: i64) -> AppResult<Vec<Model>> {
    let models = sqlx::query_as::<_, Model>(
        "SELECT m.* FROM models m
         JOIN project_models pm ON pm.model_id = m.id
         WHERE pm.project_id = ?
         ORDER BY m.created_at ASC, m.id ASC",
    )
    .bind(project_id)
    .fetch_all(conn)
    .await?;
    Ok(models)
}

pub async fn update(conn: &mut SqliteConnection, id: i64, changes: &ModelChanges) -> AppResult<Model> {
    sqlx::query_as::<_, Model>(
        "UPDATE models
         SET name = COALESCE(?, name),
             description = COALESCE(?, description),
             file_path = COALESCE(?, file_path)
         WHERE id = ?
         RETURNING *",
    )
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.file_path)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::not_found("model", id))
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM models WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    expect_affected(result, "model", id)
}
