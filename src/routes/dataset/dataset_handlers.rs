use actix_web::{web, HttpResponse};
use log::info;

use super::dataset_models::{CreateDatasetRequest, UpdateDatasetRequest};
use crate::auth::AuthenticatedUser;
use crate::db::{queries::dataset, Store};
use crate::errors::AppResult;
use crate::models::DatasetSummary;
use crate::routes::ownership::owned_dataset;
use crate::routes::pagination::ListQuery;

pub async fn create_dataset(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    req: web::Json<CreateDatasetRequest>,
) -> AppResult<HttpResponse> {
    let new = req.into_inner().into_new(user.user_id)?;
    info!("Received request to upload dataset {} for user {}", new.name, user.user_id);

    let created = store
        .run(move |conn| Box::pin(async move { dataset::create(conn, &new).await }))
        .await?;

    info!("Dataset {} created", created.id);
    Ok(HttpResponse::Created().json(DatasetSummary::from(created)))
}

pub async fn list_datasets(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page()?;
    let datasets = store
        .run(move |conn| Box::pin(dataset::list_by_owner(conn, user.user_id, page)))
        .await?;

    let datasets: Vec<DatasetSummary> = datasets.into_iter().map(DatasetSummary::from).collect();
    Ok(HttpResponse::Ok().json(datasets))
}

pub async fn get_dataset(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let found = store
        .run(move |conn| Box::pin(owned_dataset(conn, user.user_id, id)))
        .await?;
    Ok(HttpResponse::Ok().json(DatasetSummary::from(found)))
}

// Inline datasets answer with their bytes, file-backed ones with their metadata
pub async fn get_dataset_content(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let found = store
        .run(move |conn| Box::pin(owned_dataset(conn, user.user_id, id)))
        .await?;

    match found.content.inline_bytes() {
        Some(bytes) => Ok(HttpResponse::Ok()
            .content_type("application/octet-stream")
            .body(bytes.to_vec())),
        None => Ok(HttpResponse::Ok().json(DatasetSummary::from(found))),
    }
}

pub async fn update_dataset(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<UpdateDatasetRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let changes = req.into_inner().into_changes()?;
    info!("Received request to update dataset {} for user {}", id, user.user_id);

    let updated = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_dataset(conn, user.user_id, id).await?;
                dataset::update(conn, id, &changes).await
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(DatasetSummary::from(updated)))
}

pub async fn delete_dataset(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    info!("Received request to delete dataset {} for user {}", id, user.user_id);

    store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_dataset(conn, user.user_id, id).await?;
                dataset::delete(conn, id).await
            })
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
