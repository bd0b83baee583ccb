use actix::{Actor, ActorContext, Addr, AsyncContext, Handler, Running, StreamHandler};
use actix_web_actors::ws;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::realtime::model::{ClientMessage, ServerMessage};
use crate::realtime::server::{Connect, Disconnect, FeedHub, WsMessage};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// Silence longer than this drops the session.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// One websocket subscriber. Registers with the [`FeedHub`] on start and
/// relays every frame the hub queues for it.
pub struct WsSession {
    pub session_id: String,
    pub hub: Addr<FeedHub>,
    pub last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(hub: Addr<FeedHub>) -> Self {
        WsSession {
            session_id: Uuid::new_v4().to_string(),
            hub,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                log::warn!(
                    "Feed session {} heartbeat timeout, disconnecting",
                    act.session_id
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send_message(&self, msg: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        if let Ok(json) = serde_json::to_string(msg) {
            ctx.text(json);
        }
    }

    /// The feed is push-only; clients may only ping.
    fn handle_client_text(&self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let reply = match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Ping) => ServerMessage::Pong,
            Err(e) => {
                log::debug!("Feed session {} sent malformed frame: {}", self.session_id, e);
                ServerMessage::Error {
                    message: format!("Invalid message format: {}", e),
                }
            }
        };
        self.send_message(&reply, ctx);
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.start_heartbeat(ctx);

        let addr = ctx.address();
        self.hub.do_send(Connect {
            session_id: self.session_id.clone(),
            addr: addr.recipient(),
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.hub.do_send(Disconnect {
            session_id: self.session_id.clone(),
        });
        Running::Stop
    }
}

impl Handler<WsMessage> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: WsMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

/// Inbound frames. Any client traffic counts as a heartbeat.
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("Feed session {} protocol error: {}", self.session_id, e);
                ctx.stop();
                return;
            }
        };

        self.last_heartbeat = Instant::now();
        match msg {
            ws::Message::Ping(bytes) => ctx.pong(&bytes),
            ws::Message::Pong(_) => {}
            ws::Message::Text(text) => self.handle_client_text(&text, ctx),
            ws::Message::Binary(_) => {
                log::debug!("Feed session {} sent binary frame, ignored", self.session_id);
            }
            ws::Message::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            ws::Message::Continuation(_) => ctx.stop(),
            ws::Message::Nop => {}
        }
    }
}
