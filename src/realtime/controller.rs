use actix::Addr;
use actix_web::{HttpRequest, HttpResponse, web};
use actix_web_actors::ws;

use crate::realtime::server::FeedHub;
use crate::realtime::session::WsSession;

/// WebSocket connection handler
/// GET /ws/feed
pub async fn ws_feed(
    req: HttpRequest,
    stream: web::Payload,
    hub: web::Data<Addr<FeedHub>>,
) -> Result<HttpResponse, actix_web::Error> {
    log::info!(
        "Feed subscription request from {}",
        req.connection_info().peer_addr().unwrap_or("unknown")
    );

    ws::start(WsSession::new(hub.get_ref().clone()), &req, stream)
}
