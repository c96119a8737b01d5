use chrono::Utc;
use sqlx::SqliteConnection;

use super::expect_affected;
use crate::errors::{AppError, AppResult};
use crate::models::{NewPrediction, Page, Prediction};

pub async fn create(conn: &mut SqliteConnection, new: &NewPrediction) -> AppResult<Prediction> {
    let prediction = sqlx::query_as::<_, Prediction>(
        "INSERT INTO predictions (user_id, dataset_id, model_id, project_id, result_file_path, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(new.user_id)
    .bind(new.dataset_id)
    .bind(new.model_id)
    .bind(new.project_id)
    .bind(&new.result_file_path)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    Ok(prediction)
}

pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Prediction> {
    sqlx::query_as::<_, Prediction>("SELECT * FROM predictions WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("prediction", id))
}

pub async fn list_by_owner(
    conn: &mut SqliteConnection,
    user_id: i64,
    page: Page,
) -> AppResult<Vec<Prediction>> {
    let predictions = sqlx::query_as::<_, Prediction>(
        "SELECT * FROM predictions
         WHERE user_id = ?
         ORDER BY created_at ASC, id ASC
         LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(conn)
    .await?;
    Ok(predictions)
}

pub async fn list_by_project(
    conn: &mut SqliteConnection,
    project_id: i64,
) -> AppResult<Vec<Prediction>> {
    let predictions = sqlx::query_as::<_, Prediction>(
        "SELECT * FROM predictions WHERE project_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(project_id)
    .fetch_all(conn)
    .await?;
    Ok(predictions)
}

/// Only the result path of a prediction is mutable.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    result_file_path: &str,
) -> AppResult<Prediction> {
    sqlx::query_as::<_, Prediction>(
        "UPDATE predictions SET result_file_path = ? WHERE id = ? RETURNING *",
    )
    .bind(result_file_path)
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::not_found("prediction", id))
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM predictions WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    expect_affected(result, "prediction", id)
}
