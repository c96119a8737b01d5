use actix_web::web;

use crate::errors::AppError;

use super::dataset::dataset_handlers;
use super::login::login_handlers;
use super::model::model_handlers;
use super::prediction::prediction_handlers;
use super::project::project_handlers;
use super::user::user_handlers;

pub fn login_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(login_handlers::home))
        .route("/signup", web::post().to(login_handlers::signup))
        .route("/login", web::post().to(login_handlers::login));
}

pub fn user_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(user_handlers::dashboard))
        .service(
            web::resource("/users/me")
                .route(web::get().to(user_handlers::get_profile))
                .route(web::patch().to(user_handlers::update_profile))
                .route(web::delete().to(user_handlers::delete_profile)),
        );
}

pub fn dataset_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/datasets")
            .route("", web::post().to(dataset_handlers::create_dataset))
            .route("", web::get().to(dataset_handlers::list_datasets))
            .route("/{id}", web::get().to(dataset_handlers::get_dataset))
            .route("/{id}", web::patch().to(dataset_handlers::update_dataset))
            .route("/{id}", web::delete().to(dataset_handlers::delete_dataset))
            .route("/{id}/content", web::get().to(dataset_handlers::get_dataset_content)),
    );
}

pub fn model_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/models")
            .route("", web::post().to(model_handlers::create_model))
            .route("", web::get().to(model_handlers::list_models))
            .route("/{id}", web::get().to(model_handlers::get_model))
            .route("/{id}", web::patch().to(model_handlers::update_model))
            .route("/{id}", web::delete().to(model_handlers::delete_model)),
    );
}

pub fn project_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .route("", web::post().to(project_handlers::create_project))
            .route("", web::get().to(project_handlers::list_projects))
            .route("/{id}", web::get().to(project_handlers::get_project))
            .route("/{id}", web::patch().to(project_handlers::update_project))
            .route("/{id}", web::delete().to(project_handlers::delete_project))
            .route("/{id}/datasets", web::get().to(project_handlers::list_project_datasets))
            .route("/{id}/datasets/{dataset_id}", web::put().to(project_handlers::attach_dataset))
            .route("/{id}/datasets/{dataset_id}", web::delete().to(project_handlers::detach_dataset))
            .route("/{id}/models", web::get().to(project_handlers::list_project_models))
            .route("/{id}/models/{model_id}", web::put().to(project_handlers::attach_model))
            .route("/{id}/models/{model_id}", web::delete().to(project_handlers::detach_model))
            .route("/{id}/logs", web::get().to(project_handlers::list_project_logs))
            .route("/{id}/predictions", web::get().to(project_handlers::list_project_predictions)),
    );
}

pub fn prediction_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/predictions")
            .route("", web::post().to(prediction_handlers::create_prediction))
            .route("", web::get().to(prediction_handlers::list_predictions))
            .route("/{id}", web::get().to(prediction_handlers::get_prediction))
            .route("/{id}", web::patch().to(prediction_handlers::update_prediction))
            .route("/{id}", web::delete().to(prediction_handlers::delete_prediction)),
    );
}

/// Every area, plus extractor errors rendered like any other validation error.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::validation(err.to_string()).into()),
    );

    login_configure(cfg);
    user_configure(cfg);
    dataset_configure(cfg);
    model_configure(cfg);
    project_configure(cfg);
    prediction_configure(cfg);
}

#[cfg(test)]
mod tests {
    use actix_web::{http::header, http::StatusCode, test};
    use serde_json::Value;

    use crate::db::Store;
    use crate::test_util::user_with_token;

    #[actix_web::test]
    async fn malformed_input_is_a_validation_error() {
        let store = Store::in_memory().await;
        let (_, auth) = user_with_token(&store, "r@x.com").await;
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/signup")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());

        let req = test::TestRequest::get()
            .uri("/datasets?limit=lots")
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/models/abc")
            .insert_header(("Authorization", auth))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
