use crate::post::post_index::post_routes;
use crate::realtime::index::realtime_routes;
use crate::uploader::index::image_routes;
use crate::user::index::user_routes;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the social feed API",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(user_routes);
    cfg.configure(post_routes);
    cfg.configure(image_routes);
    cfg.configure(realtime_routes);
    cfg.service(default);
}
