use super::controller::ws_feed;
use actix_web::web;

pub fn realtime_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/ws").route("/feed", web::get().to(ws_feed)));
}
