//! Fixtures shared by the unit tests.

use std::time::Duration;

use sqlx::SqliteConnection;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::db::queries::{project, user};
use crate::db::Store;
use crate::models::{DatasetContent, NewDataset, NewModel, NewProject, NewUser, Project, User};

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        jwt_secret: SECRET.as_bytes().to_vec(),
        token_ttl: Duration::from_secs(3600),
        pool_size: 1,
        db_timeout: Duration::from_secs(5),
        bcrypt_cost: 4,
        server_address: "127.0.0.1:0".into(),
    }
}

pub fn test_keys() -> TokenKeys {
    let config = test_config();
    TokenKeys::new(&config.jwt_secret, config.token_ttl).unwrap()
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.into(),
        password_hash: "$2b$04$not.a.real.hash".into(),
        full_name: None,
    }
}

pub async fn seed_user(conn: &mut SqliteConnection, email: &str) -> User {
    user::create(conn, &new_user(email)).await.unwrap()
}

pub async fn seed_project(conn: &mut SqliteConnection, owner_user_id: i64, name: &str) -> Project {
    let new = NewProject {
        owner_user_id,
        name: name.into(),
        description: None,
    };
    project::create(conn, &new).await.unwrap()
}

pub fn new_dataset(user_id: i64, name: &str) -> NewDataset {
    NewDataset {
        user_id,
        name: name.into(),
        description: None,
        content: DatasetContent::FilePath(format!("/data/{}.csv", name)),
    }
}

pub fn new_model(user_id: i64, name: &str) -> NewModel {
    NewModel {
        user_id,
        name: name.into(),
        description: Some("This is a test model".into()),
        file_path: "/tmp/model.bin".into(),
    }
}

/// Migrated database in a temp file behind a pool of `pool_size` connections,
/// for tests that need real concurrency. Keep the `TempDir` alive.
pub async fn file_store(pool_size: u32) -> (Store, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        database_url: format!("sqlite://{}", dir.path().join("sfp.db").display()),
        pool_size,
        ..test_config()
    };
    let store = Store::connect(&config).await.unwrap();
    store.migrate().await.unwrap();
    (store, dir)
}

/// Token for a freshly created user, as an `Authorization` header value.
pub async fn user_with_token(store: &Store, email: &str) -> (i64, String) {
    let mut conn = store.pool().acquire().await.unwrap();
    let user = seed_user(&mut conn, email).await;
    let token = test_keys().issue(user.id).unwrap();
    (user.id, format!("Bearer {}", token))
}

/// Full application service over `store`, wired like `main`.
macro_rules! test_app {
    ($store:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($store.clone()))
                .app_data(actix_web::web::Data::new($crate::test_util::test_keys()))
                .app_data(actix_web::web::Data::new($crate::test_util::test_config()))
                .configure($crate::routes::routes::configure),
        )
        .await
    };
}
