use super::controller::{get_status, login, signup, update_status};
use crate::middleware::auth::verify_token;
use crate::utils::error::CustomError;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                CustomError::ValidationError(format!("Invalid request body: {}", err)).into()
            }))
            .route("/signup", web::put().to(signup))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/status")
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route(web::get().to(get_status))
                    .route(web::patch().to(update_status)),
            ),
    );
}
