use super::controller::serve_image;
use actix_web::web;

pub fn image_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/images").route("/{filename}", web::get().to(serve_image)));
}
