//! Lookups scoped to the authenticated user. A row owned by someone else is
//! reported exactly like a missing one.

use sqlx::SqliteConnection;

use crate::db::queries::{dataset, model, prediction, project};
use crate::errors::{AppError, AppResult};
use crate::models::{Dataset, Model, Prediction, Project};

pub async fn owned_project(conn: &mut SqliteConnection, user_id: i64, id: i64) -> AppResult<Project> {
    let project = project::get_by_id(conn, id).await?;
    if project.owner_user_id != user_id {
        return Err(AppError::not_found("project", id));
    }
    Ok(project)
}

pub async fn owned_dataset(conn: &mut SqliteConnection, user_id: i64, id: i64) -> AppResult<Dataset> {
    let dataset = dataset::get_by_id(conn, id).await?;
    if dataset.user_id != user_id {
        return Err(AppError::not_found("dataset", id));
    }
    Ok(dataset)
}

pub async fn owned_model(conn: &mut SqliteConnection, user_id: i64, id: i64) -> AppResult<Model> {
    let model = model::get_by_id(conn, id).await?;
    if model.user_id != user_id {
        return Err(AppError::not_found("model", id));
    }
    Ok(model)
}

pub async fn owned_prediction(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> AppResult<Prediction> {
    let prediction = prediction::get_by_id(conn, id).await?;
    if prediction.user_id != user_id {
        return Err(AppError::not_found("prediction", id));
    }
    Ok(prediction)
}
