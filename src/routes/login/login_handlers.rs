use actix_web::{http::header, web, HttpRequest, HttpResponse};
use log::{info, warn};

use super::login_models::{
    HomeResponse, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
};
use crate::auth::{bearer_token, dummy_hash, hash_password, verify_password, TokenKeys};
use crate::config::Config;
use crate::db::{queries::user, Store};
use crate::errors::{AppError, AppResult};
use crate::models::NewUser;

// Send logged-in callers to their dashboard
pub async fn home(req: HttpRequest, keys: web::Data<TokenKeys>) -> HttpResponse {
    match bearer_token(&req).map(|token| keys.validate(token)) {
        Some(Ok(user_id)) => {
            info!("Redirecting user {} to dashboard", user_id);
            HttpResponse::Found()
                .insert_header((header::LOCATION, "/dashboard"))
                .finish()
        }
        _ => HttpResponse::Unauthorized().json(HomeResponse {
            message: "Please log in first.",
        }),
    }
}

// Register user to DB
pub async fn signup(
    store: web::Data<Store>,
    config: web::Data<Config>,
    req: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let (email, full_name) = req.validate()?;
    info!("Received request to register user: {}", email);

    // Hash with bcrypt before anything touches the database
    let password_hash = hash_password(&req.password, config.bcrypt_cost).await?;
    let new = NewUser {
        email,
        password_hash,
        full_name,
    };

    let created = store
        .run(move |conn| Box::pin(async move { user::create(conn, &new).await }))
        .await
        .map_err(|e| match e {
            AppError::ConstraintViolation(_) => AppError::validation("email is already registered"),
            other => other,
        })?;

    info!("User {} registered successfully", created.id);
    Ok(HttpResponse::Created().json(SignupResponse {
        user_id: created.id,
        email: created.email,
    }))
}

// Login logic
pub async fn login(
    store: web::Data<Store>,
    keys: web::Data<TokenKeys>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let email = req.email.trim().to_lowercase();
    info!("Received login request for user: {}", email);

    let lookup = email.clone();
    let found = match store
        .run(move |conn| Box::pin(async move { user::get_by_email(conn, &lookup).await }))
        .await
    {
        Ok(found) => found,
        Err(AppError::NotFound { .. }) => {
            info!("Unknown email on login: {}", email);
            // Same bcrypt cost as a wrong password
            verify_password(&req.password, dummy_hash(config.bcrypt_cost).await?).await?;
            return Err(AppError::Unauthorized("Invalid credentials"));
        }
        Err(e) => return Err(e),
    };

    if !verify_password(&req.password, &found.password_hash).await? {
        warn!("Invalid password for user: {}", found.id);
        return Err(AppError::Unauthorized("Invalid credentials"));
    }

    let token = keys.issue(found.id)?;
    info!("User {} logged in successfully", found.id);
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: config.token_ttl.as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::auth::verify_password;
    use crate::db::{queries::user, Store};
    use crate::test_util::{file_store, test_keys};

    #[actix_web::test]
    async fn signup_hashes_password() {
        let store = Store::in_memory().await;
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "email": "a@x.com", "password": "secret1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let user_id = body["user_id"].as_i64().unwrap();
        assert!(user_id > 0);

        let mut conn = store.pool().acquire().await.unwrap();
        let stored = user::get_by_id(&mut conn, user_id).await.unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(verify_password("secret1", &stored.password_hash).await.unwrap());
        assert!(!verify_password("wrong", &stored.password_hash).await.unwrap());
    }

    #[actix_web::test]
    async fn signup_rejects_bad_input_and_duplicates() {
        let store = Store::in_memory().await;
        let app = test_app!(store);

        for body in [
            json!({ "email": "not-an-email", "password": "secret1" }),
            json!({ "email": "a@x.com", "password": "short" }),
        ] {
            let req = test::TestRequest::post().uri("/signup").set_json(body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let signup = || {
            test::TestRequest::post()
                .uri("/signup")
                .set_json(json!({ "email": "a@x.com", "password": "secret1" }))
                .to_request()
        };
        assert_eq!(test::call_service(&app, signup()).await.status(), StatusCode::CREATED);
        assert_eq!(test::call_service(&app, signup()).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn login_issues_a_token_for_the_user() {
        let store = Store::in_memory().await;
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "email": "a@x.com", "password": "secret1", "full_name": "A" }))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let user_id = body["user_id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "A@x.com", "password": "secret1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let token = body["token"].as_str().unwrap();
        assert_eq!(test_keys().validate(token).unwrap(), user_id);
    }

    #[actix_web::test]
    async fn login_with_bad_credentials_is_unauthorized() {
        let store = Store::in_memory().await;
        let app = test_app!(store);

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "email": "a@x.com", "password": "secret1" }))
            .to_request();
        test::call_service(&app, req).await;

        for body in [
            json!({ "email": "a@x.com", "password": "wrong1" }),
            json!({ "email": "b@x.com", "password": "secret1" }),
        ] {
            let req = test::TestRequest::post().uri("/login").set_json(body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn home_redirects_only_with_valid_token() {
        let store = Store::in_memory().await;
        let app = test_app!(store);

        let req = test::TestRequest::get().uri("/").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let token = test_keys().issue(1).unwrap();
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("location").unwrap(), "/dashboard");
    }

    #[actix_web::test]
    async fn concurrent_signups_with_one_email_create_one_user() {
        let (store, _dir) = file_store(4).await;
        let app = test_app!(store);

        let signup = || {
            test::TestRequest::post()
                .uri("/signup")
                .set_json(json!({ "email": "race@x.com", "password": "secret1" }))
                .to_request()
        };
        let (first, second) = futures::join!(
            test::call_service(&app, signup()),
            test::call_service(&app, signup())
        );

        let mut statuses = vec![first.status(), second.status()];
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::BAD_REQUEST]);

        let mut conn = store.pool().acquire().await.unwrap();
        assert!(user::get_by_email(&mut conn, "race@x.com").await.is_ok());
    }
}
