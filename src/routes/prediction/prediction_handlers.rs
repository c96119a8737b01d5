use actix_web::{web, HttpResponse};
use log::info;

use super::prediction_models::{CreatePredictionRequest, UpdatePredictionRequest};
use crate::auth::AuthenticatedUser;
use crate::db::queries::{log_entry, prediction};
use crate::db::Store;
use crate::errors::AppResult;
use crate::models::NewLogEntry;
use crate::routes::ownership::{owned_dataset, owned_model, owned_prediction, owned_project};
use crate::routes::pagination::ListQuery;

/// Records a prediction run. The project, dataset and model must all belong
/// to the caller; the project log gets a matching entry.
pub async fn create_prediction(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    req: web::Json<CreatePredictionRequest>,
) -> AppResult<HttpResponse> {
    let new = req.into_inner().into_new(user.user_id)?;
    info!(
        "Received request to record prediction of model {} on dataset {} in project {}",
        new.model_id, new.dataset_id, new.project_id
    );

    let created = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, new.project_id).await?;
                let dataset = owned_dataset(conn, user.user_id, new.dataset_id).await?;
                let model = owned_model(conn, user.user_id, new.model_id).await?;

                let created = prediction::create(conn, &new).await?;
                let entry = NewLogEntry::new(
                    user.user_id,
                    new.project_id,
                    "Predicted",
                    format!("Ran model {} on dataset {}", model.name, dataset.name),
                );
                log_entry::create(conn, &entry).await?;
                Ok(created)
            })
        })
        .await?;

    info!("Prediction {} recorded", created.id);
    Ok(HttpResponse::Created().json(created))
}

pub async fn list_predictions(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page()?;
    let predictions = store
        .run(move |conn| Box::pin(prediction::list_by_owner(conn, user.user_id, page)))
        .await?;
    Ok(HttpResponse::Ok().json(predictions))
}

pub async fn get_prediction(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let found = store
        .run(move |conn| Box::pin(owned_prediction(conn, user.user_id, id)))
        .await?;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn update_prediction(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<UpdatePredictionRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let result_file_path = req.result_file_path()?;

    let updated = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_prediction(conn, user.user_id, id).await?;
                prediction::update(conn, id, &result_file_path).await
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_prediction(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    info!("Received request to delete prediction {} for user {}", id, user.user_id);

    store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_prediction(conn, user.user_id, id).await?;
                prediction::delete(conn, id).await
            })
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
