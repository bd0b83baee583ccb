use std::sync::Arc;

use actix::Actor;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use social_feed_api::config::AppConfig;
use social_feed_api::database;
use social_feed_api::middleware::error_handler::error_handlers;
use social_feed_api::post::post_repository::MongoPostRepository;
use social_feed_api::post::post_service::PostService;
use social_feed_api::realtime::server::FeedHub;
use social_feed_api::router::index::routes;
use social_feed_api::user::repository::{MongoUserRepository, UserRepository};
use social_feed_api::user::service::UserService;
use social_feed_api::utils::uploads::ImageStorage;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let db = database::connect_to_mongo(&config).await.map_err(|e| {
        error!("Failed to connect to MongoDB: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let images = ImageStorage::new(&config.upload_dir);
    images.init().await?;

    let hub = FeedHub::new().start();
    let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));

    let post_service = web::Data::new(PostService::new(
        Arc::new(MongoPostRepository::new(&db)),
        users.clone(),
        images.clone(),
        Arc::new(hub.clone()),
    ));
    let user_service = web::Data::new(UserService::new(users, config.jwt_secret.clone()));
    let image_data = web::Data::new(images);
    let hub_data = web::Data::new(hub);
    let config_data = web::Data::new(config.clone());

    info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(config_data.clone())
            .app_data(post_service.clone())
            .app_data(user_service.clone())
            .app_data(image_data.clone())
            .app_data(hub_data.clone())
            .configure(routes)
            .wrap(error_handlers())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
