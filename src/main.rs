use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

mod auth;
mod config;
mod db;
mod errors;
mod models;
#[cfg(test)]
#[macro_use]
mod test_util;
mod routes;

use auth::TokenKeys;
use config::Config;
use db::Store;

fn startup_error(e: errors::AppError) -> io::Error {
    error!("Startup failed: {}", e);
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let store = Store::connect(&config).await.map_err(startup_error)?;
    store.migrate().await.map_err(startup_error)?;
    let keys = TokenKeys::new(&config.jwt_secret, config.token_ttl).map_err(startup_error)?;
    auth::dummy_hash(config.bcrypt_cost).await.map_err(startup_error)?;

    let server_address = config.server_address.clone();
    info!("Server running at http://{}", server_address);

    let store = web::Data::new(store);
    let keys = web::Data::new(keys);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(keys.clone())
            .app_data(config.clone())
            .configure(routes::routes::configure)
    })
    .bind(server_address)?
    .run()
    .await
}
