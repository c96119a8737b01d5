use actix_web::{web, HttpResponse};
use log::info;

use super::user_models::{DashboardResponse, UpdateProfileRequest};
use crate::auth::{hash_password, AuthenticatedUser};
use crate::config::Config;
use crate::db::queries::{dataset, model, project, user};
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{DatasetSummary, Page, UserChanges};
use crate::routes::validation;

// Profile plus the first page of everything the user owns
pub async fn dashboard(store: web::Data<Store>, user: AuthenticatedUser) -> AppResult<HttpResponse> {
    info!("Loading dashboard for user {}", user.user_id);

    let response = store
        .run_snapshot(move |conn| {
            Box::pin(async move {
                let page = Page::default();
                let profile = user::get_by_id(conn, user.user_id).await?;
                let datasets = dataset::list_by_owner(conn, user.user_id, page).await?;
                let models = model::list_by_owner(conn, user.user_id, page).await?;
                let projects = project::list_by_owner(conn, user.user_id, page).await?;
                Ok(DashboardResponse {
                    user: profile,
                    datasets: datasets.into_iter().map(DatasetSummary::from).collect(),
                    models,
                    projects,
                })
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_profile(store: web::Data<Store>, user: AuthenticatedUser) -> AppResult<HttpResponse> {
    let profile = store
        .run(move |conn| Box::pin(user::get_by_id(conn, user.user_id)))
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_profile(
    store: web::Data<Store>,
    config: web::Data<Config>,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = req.into_inner();
    info!("Received request to update profile of user {}", user.user_id);

    let email = req.email.as_deref().map(validation::email).transpose()?;
    let password_hash = match req.password.as_deref() {
        Some(password) => {
            validation::password(password)?;
            Some(hash_password(password, config.bcrypt_cost).await?)
        }
        None => None,
    };
    let changes = UserChanges {
        email,
        password_hash,
        full_name: validation::optional(req.full_name),
    };

    let updated = store
        .run(move |conn| Box::pin(async move { user::update(conn, user.user_id, &changes).await }))
        .await
        .map_err(|e| match e {
            AppError::ConstraintViolation(_) => AppError::validation("email is already registered"),
            other => other,
        })?;
    Ok(HttpResponse::Ok().json(updated))
}

// Deleting the account removes everything it owns
pub async fn delete_profile(store: web::Data<Store>, user: AuthenticatedUser) -> AppResult<HttpResponse> {
    info!("Received request to delete user {}", user.user_id);
    store
        .run(move |conn| Box::pin(user::delete(conn, user.user_id)))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
