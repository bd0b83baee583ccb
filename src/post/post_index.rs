use super::post_controller::{create_post, delete_post, get_post, get_posts, update_post};
use crate::middleware::auth::verify_token;
use crate::utils::error::CustomError;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn post_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/feed")
            .wrap(HttpAuthentication::bearer(verify_token))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                CustomError::ValidationError(format!("Invalid query: {}", err)).into()
            }))
            .route("/posts", web::get().to(get_posts))
            .route("/post", web::post().to(create_post))
            .route("/post/{postId}", web::get().to(get_post))
            .route("/post/{postId}", web::put().to(update_post))
            .route("/post/{postId}", web::delete().to(delete_post)),
    );
}
