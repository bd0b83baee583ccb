use serde::{Deserialize, Serialize};

use crate::post::post_model::PostResponse;

/// Topic carrying post lifecycle events.
pub const POSTS_TOPIC: &str = "posts";

/// Payload pushed on the `posts` topic after a successful mutation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PostEvent {
    Create { post: PostResponse },
    Update { post: PostResponse },
    /// Carries the id of the deleted post.
    Delete { post: String },
}

/// WebSocket message from client
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping to keep connection alive
    Ping,
}

/// WebSocket message to client
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected { session_id: String },
    /// Event published on a topic
    Event {
        event: String,
        data: serde_json::Value,
    },
    /// Error message
    Error { message: String },
    /// Pong response
    Pong,
}
