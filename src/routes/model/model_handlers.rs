use actix_web::{web, HttpResponse};
use log::info;

use super::model_models::{CreateModelRequest, UpdateModelRequest};
use crate::auth::AuthenticatedUser;
use crate::db::{queries::model, Store};
use crate::errors::AppResult;
use crate::routes::ownership::owned_model;
use crate::routes::pagination::ListQuery;

pub async fn create_model(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    req: web::Json<CreateModelRequest>,
) -> AppResult<HttpResponse> {
    let new = req.into_inner().into_new(user.user_id)?;
    info!("Received request to register model {} for user {}", new.name, user.user_id);

    let created = store
        .run(move |conn| Box::pin(async move { model::create(conn, &new).await }))
        .await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn list_models(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page()?;
    let models = store
        .run(move |conn| Box::pin(model::list_by_owner(conn, user.user_id, page)))
        .await?;
    Ok(HttpResponse::Ok().json(models))
}

pub async fn get_model(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let found = store
        .run(move |conn| Box::pin(owned_model(conn, user.user_id, id)))
        .await?;
    Ok(HttpResponse::Ok().json(found))
}

pub async fn update_model(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<UpdateModelRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let changes = req.into_inner().into_changes()?;
    info!("Received request to update model {} for user {}", id, user.user_id);

    let updated = store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_model(conn, user.user_id, id).await?;
                model::update(conn, id, &changes).await
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_model(
    store: web::Data<Store>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    info!("Received request to delete model {} for user {}", id, user.user_id);

    store
        .run_in_transaction(move |conn| {
            Box::pin(async move {
                owned_model(conn, user.user_id, id).await?;
                model::delete(conn, id).await
            })
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::db::Store;
    use crate::test_util::user_with_token;

    #[actix_web::test]
    async fn model_crud_over_http() {
        let store = Store::in_memory().await;
        let (user_id, auth) = user_with_token(&store, "m@x.com").await;
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/models")
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({ "name": "forest", "file_path": "/tmp/model.bin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["user_id"].as_i64(), Some(user_id));

        let req = test::TestRequest::patch()
            .uri(&format!("/models/{}", id))
            .insert_header(("Authorization", auth.clone()))
            .set_json(json!({ "file_path": "/tmp/updated_model.bin" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["file_path"], "/tmp/updated_model.bin");
        assert_eq!(updated["name"], "forest");

        let req = test::TestRequest::get()
            .uri("/models")
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/models/{}", id))
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/models/{}", id))
            .insert_header(("Authorization", auth))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn blank_file_path_is_rejected() {
        let store = Store::in_memory().await;
        let (_, auth) = user_with_token(&store, "m@x.com").await;
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/models")
            .insert_header(("Authorization", auth))
            .set_json(json!({ "name": "forest", "file_path": " " }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
