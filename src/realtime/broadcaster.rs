use actix::Addr;

use crate::realtime::server::{Broadcast, FeedHub};

/// Publish side of the real-time channel.
///
/// `emit` must not block and must not fail the caller; delivery is best-effort.
pub trait EventBroadcaster: Send + Sync {
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

impl EventBroadcaster for Addr<FeedHub> {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.do_send(Broadcast {
            topic: topic.to_string(),
            payload,
        });
    }
}
