use crate::realtime::model::ServerMessage;
use actix::prelude::*;
use std::collections::HashMap;

/// Message sent to the hub to register a session
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub session_id: String,
    pub addr: Recipient<WsMessage>,
}

/// Message sent to the hub when a session disconnects
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub session_id: String,
}

/// Publish a payload on a topic to every connected session.
/// Resolves to the number of sessions the frame was queued for.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct Broadcast {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// WebSocket message wrapper
#[derive(Message)]
#[rtype(result = "()")]
pub struct WsMessage(pub String);

/// Feed hub actor - tracks live websocket sessions and fans events out to them
pub struct FeedHub {
    /// Map of session_id -> session address
    sessions: HashMap<String, Recipient<WsMessage>>,
}

impl FeedHub {
    pub fn new() -> Self {
        FeedHub {
            sessions: HashMap::new(),
        }
    }

    fn send_to_session(&self, session_id: &str, message: &ServerMessage) {
        if let Some(addr) = self.sessions.get(session_id) {
            let msg_json = serde_json::to_string(message).unwrap_or_default();
            addr.do_send(WsMessage(msg_json));
        }
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for FeedHub {
    type Context = Context<Self>;
}

impl Handler<Connect> for FeedHub {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        log::info!("Feed session {} connected", msg.session_id);

        self.sessions.insert(msg.session_id.clone(), msg.addr);

        self.send_to_session(
            &msg.session_id,
            &ServerMessage::Connected {
                session_id: msg.session_id.clone(),
            },
        );
    }
}

impl Handler<Disconnect> for FeedHub {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        log::info!("Feed session {} disconnected", msg.session_id);
        self.sessions.remove(&msg.session_id);
    }
}

impl Handler<Broadcast> for FeedHub {
    type Result = usize;

    fn handle(&mut self, msg: Broadcast, _: &mut Context<Self>) -> usize {
        let frame = ServerMessage::Event {
            event: msg.topic,
            data: msg.payload,
        };
        let msg_json = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize feed event: {}", e);
                return 0;
            }
        };

        for addr in self.sessions.values() {
            addr.do_send(WsMessage(msg_json.clone()));
        }

        log::debug!("Broadcast event to {} sessions", self.sessions.len());
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Actor for Recorder {
        type Context = Context<Self>;
    }

    impl Handler<WsMessage> for Recorder {
        type Result = ();

        fn handle(&mut self, msg: WsMessage, _: &mut Context<Self>) {
            self.0.lock().unwrap().push(msg.0);
        }
    }

    #[derive(Message)]
    #[rtype(result = "()")]
    struct Flush;

    impl Handler<Flush> for Recorder {
        type Result = ();

        fn handle(&mut self, _: Flush, _: &mut Context<Self>) {}
    }

    fn recorder() -> (Addr<Recorder>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Recorder(log.clone()).start(), log)
    }

    #[actix_web::test]
    async fn broadcast_reaches_every_connected_session() {
        let hub = FeedHub::new().start();
        let (a, a_log) = recorder();
        let (b, b_log) = recorder();

        for (id, addr) in [("a", &a), ("b", &b)] {
            hub.send(Connect {
                session_id: id.into(),
                addr: addr.clone().recipient(),
            })
            .await
            .unwrap();
        }

        let delivered = hub
            .send(Broadcast {
                topic: "posts".into(),
                payload: json!({ "action": "delete", "post": "p1" }),
            })
            .await
            .unwrap();
        assert_eq!(delivered, 2);

        a.send(Flush).await.unwrap();
        b.send(Flush).await.unwrap();

        let a_frames = a_log.lock().unwrap().clone();
        assert_eq!(a_frames.len(), 2);
        let connected: serde_json::Value = serde_json::from_str(&a_frames[0]).unwrap();
        assert_eq!(connected["type"], "connected");
        let event: serde_json::Value = serde_json::from_str(&a_frames[1]).unwrap();
        assert_eq!(event["event"], "posts");
        assert_eq!(event["data"]["post"], "p1");
        assert_eq!(b_log.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn disconnected_sessions_stop_receiving() {
        let hub = FeedHub::new().start();
        let (a, a_log) = recorder();

        hub.send(Connect {
            session_id: "a".into(),
            addr: a.clone().recipient(),
        })
        .await
        .unwrap();
        hub.send(Disconnect {
            session_id: "a".into(),
        })
        .await
        .unwrap();

        let delivered = hub
            .send(Broadcast {
                topic: "posts".into(),
                payload: json!({}),
            })
            .await
            .unwrap();
        assert_eq!(delivered, 0);

        a.send(Flush).await.unwrap();
        assert_eq!(a_log.lock().unwrap().len(), 1);
    }
}
