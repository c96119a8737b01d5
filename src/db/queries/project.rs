use chrono::Utc;
use sqlx::SqliteConnection;

use super::expect_affected;
use crate::errors::{AppError, AppResult};
use crate::models::{NewProject, Page, Project, ProjectChanges};

pub async fn create(conn: &mut SqliteConnection, new: &NewProject) -> AppResult<Project> {
    let project = sqlx::query_as::<_, Project>(
        "INSERT INTO projects (owner_user_id, name, description, created_at)
         VALUES (?, ?, ?, ?)
         RETURNING *",
    )
    .bind(new.owner_user_id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(project)
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Project> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("project", id))
}

pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    owner_user_id: i64,
    page: Page,
) -> AppResult<Vec<Project>> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects
         WHERE owner_user_id = ?
         ORDER BY created_at ASC, id ASC
         LIMIT ? OFFSET ?",
    )
    .bind(owner_user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(conn)
    .await?;
    Ok(projects)
}

pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    changes: &ProjectChanges,
) -> AppResult<Project> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects
         SET name = COALESCE(?, name),
             description = COALESCE(?, description)
         WHERE id = ?
         RETURNING *",
    )
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::not_found("project", id))
}

/// Deleting a project also drops its memberships, predictions and logs.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    expect_affected(result, "project", id)
}

/// Returns `true` when the dataset was not attached before.
pub async fn attach_dataset(
    conn: &mut SqliteConnection,
    project_id: i64,
    dataset_id: i64,
) -> AppResult<bool> {
    let result = sqlx::query(
        "INSERT INTO project_datasets (project_id, dataset_id) VALUES (?, ?)
         ON CONFLICT (project_id, dataset_id) DO NOTHING",
    )
    .bind(project_id)
    .bind(dataset_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn detach_dataset(
    conn: &mut SqliteConnection,
    project_id: i64,
    dataset_id: i64,
) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM project_datasets WHERE project_id = ? AND dataset_id = ?")
        .bind(project_id)
        .bind(dataset_id)
        .execute(conn)
        .await?;
    expect_affected(
        result,
        "project dataset",
        format!("{}/{}", project_id, dataset_id),
    )
}

/// Returns `true` when the model was not attached before.
pub async fn attach_model(
    conn: &mut SqliteConnection,
    project_id: i64,
    model_id: i64,
) -> AppResult<bool> {
    let result = sqlx::query(
        "INSERT INTO project_models (project_id, model_id) VALUES (?, ?)
         ON CONFLICT (project_id, model_id) DO NOTHING",
    )
    .bind(project_id)
    .bind(model_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn detach_model(
    conn: &mut SqliteConnection,
    project_id: i64,
    model_id: i64,
) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM project_models WHERE project_id = ? AND model_id = ?")
        .bind(project_id)
        .bind(model_id)
        .execute(conn)
        .await?;
    expect_affected(result, "project model", format!("{}/{}", project_id, model_id))
}
