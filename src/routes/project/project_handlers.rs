use actix_web::{web, HttpResponse};
use log::info;

use super::project_models::{
    CreateProjectRequest, MembershipResponse, ProjectDetailResponse, UpdateProjectRequest,
};
use crate::auth::AuthenticatedUser;
use crate::db::queries::{dataset, log_entry, model, prediction, project};
use crate::db::Store;
use crate::errors::AppResult;
use crate::models::{DatasetSummary, NewLogEntry};
use crate::routes::ownership::{owned_dataset, owned_model, owned_project};
use crate::routes::pagination::ListQuery;

pub async fn create_project(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    req: web::Json<CreateProjectRequest>,
) -> AppResult<HttpResponse> {
    let new = req.into_inner().into_new(user.user_id)?;
    info!("Received request to add project {} for user {}", new.name, user.user_id);

    let created = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                let created = project::create(conn, &new).await?;
                let entry = NewLogEntry::new(
                    user.user_id,
                    created.id,
                    "Created",
                    format!("Created project {}", created.name),
                );
                log_entry::create(conn, &entry).await?;
                Ok(created)
            })
        })
        .await?;

    info!("Project {} created", created.id);
    Ok(HttpResponse::Created().json(created))
}

pub async fn list_projects(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page()?;
    let projects = store
        .run(move |conn| Box::pin(project::list_by_owner(conn, user.user_id, page)))
        .await?;
    Ok(HttpResponse::Ok().json(projects))
}

pub async fn get_project(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    // One snapshot for the project and its memberships
    let detail = store
        .run_snapshot(move |conn| {
            Box::pin(async move {
                let project = owned_project(conn, user.user_id, id).await?;
                let datasets = dataset::list_by_project(conn, id).await?;
                let models = model::list_by_project(conn, id).await?;
                Ok(ProjectDetailResponse {
                    project,
                    datasets: datasets.into_iter().map(DatasetSummary::from).collect(),
                    models,
                })
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn update_project(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<UpdateProjectRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let changes = req.into_inner().into_changes()?;
    info!("Received request to update project {} for user {}", id, user.user_id);

    let updated = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, id).await?;
                let updated = project::update(conn, id, &changes).await?;
                let entry = NewLogEntry::new(
                    user.user_id,
                    id,
                    "Updated",
                    format!("Updated project {}", updated.name),
                );
                log_entry::create(conn, &entry).await?;
                Ok(updated)
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_project(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    info!("Received request to delete project {} for user {}", id, user.user_id);

    store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, id).await?;
                project::delete(conn, id).await
            })
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_project_datasets(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let datasets = store
        .run(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, id).await?;
                dataset::list_by_project(conn, id).await
            })
        })
        .await?;

    let datasets: Vec<DatasetSummary> = datasets.into_iter().map(DatasetSummary::from).collect();
    Ok(HttpResponse::Ok().json(datasets))
}

pub async fn list_project_models(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let models = store
        .run(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, id).await?;
                model::list_by_project(conn, id).await
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(models))
}

// Attach a dataset and record it in the project log, atomically
pub async fn attach_dataset(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (project_id, dataset_id) = path.into_inner();
    info!("Received request to attach dataset {} to project {}", dataset_id, project_id);

    let attached = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, project_id).await?;
                let found = owned_dataset(conn, user.user_id, dataset_id).await?;
                let attached = project::attach_dataset(conn, project_id, dataset_id).await?;
                if attached {
                    let entry = NewLogEntry::new(
                        user.user_id,
                        project_id,
                        "Attached dataset",
                        format!("Attached dataset {} ({})", found.name, dataset_id),
                    );
                    log_entry::create(conn, &entry).await?;
                }
                Ok(attached)
            })
        })
        .await?;

    Ok(HttpResponse::Ok().json(MembershipResponse {
        success: true,
        message: if attached {
            "Dataset attached".into()
        } else {
            "Dataset already attached".into()
        },
    }))
}

pub async fn detach_dataset(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (project_id, dataset_id) = path.into_inner();
    info!("Received request to detach dataset {} from project {}", dataset_id, project_id);

    store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, project_id).await?;
                project::detach_dataset(conn, project_id, dataset_id).await?;
                let entry = NewLogEntry::new(
                    user.user_id,
                    project_id,
                    "Detached dataset",
                    format!("Detached dataset {}", dataset_id),
                );
                log_entry::create(conn, &entry).await?;
                Ok(())
            })
        })
        .await?;

    Ok(HttpResponse::Ok().json(MembershipResponse {
        success: true,
        message: "Dataset detached".into(),
    }))
}

pub async fn attach_model(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (project_id, model_id) = path.into_inner();
    info!("Received request to attach model {} to project {}", model_id, project_id);

    let attached = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, project_id).await?;
                let found = owned_model(conn, user.user_id, model_id).await?;
                let attached = project::attach_model(conn, project_id, model_id).await?;
                if attached {
                    let entry = NewLogEntry::new(
                        user.user_id,
                        project_id,
                        "Attached model",
                        format!("Attached model {} ({})", found.name, model_id),
                    );
                    log_entry::create(conn, &entry).await?;
                }
                Ok(attached)
            })
        })
        .await?;

    Ok(HttpResponse::Ok().json(MembershipResponse {
        success: true,
        message: if attached {
            "Model attached".into()
        } else {
            "Model already attached".into()
        },
    }))
}

pub async fn detach_model(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (project_id, model_id) = path.into_inner();
    info!("Received request to detach model {} from project {}", model_id, project_id);

    store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, project_id).await?;
                project::detach_model(conn, project_id, model_id).await?;
                let entry = NewLogEntry::new(
                    user.user_id,
                    project_id,
                    "Detached model",
                    format!("Detached model {}", model_id),
                );
                log_entry::create(conn, &entry).await?;
                Ok(())
            })
        })
        .await?;

    Ok(HttpResponse::Ok().json(MembershipResponse {
        success: true,
        message: "Model detached".into(),
    }))
}

pub async fn list_project_logs(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let page = query.page()?;
    let entries = store
        .run(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, id).await?;
                log_entry::list_by_project(conn, id, page).await
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub async fn list_project_predictions(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let predictions = store
        .run(move |conn| {
            Box::pin(async move {
                owned_project(conn, user.user_id, id).await?;
                prediction::list_by_project(conn, id).await
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(predictions))
}
