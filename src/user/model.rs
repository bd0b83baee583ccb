use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATUS: &str = "I am new!";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub password: String,
    pub name: String,
    pub status: String,
    /// Posts authored by this user, in creation order.
    #[serde(default)]
    pub posts: Vec<ObjectId>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl User {
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        let now = bson::DateTime::now();
        User {
            id: ObjectId::new(),
            email,
            password: password_hash,
            name,
            status: DEFAULT_STATUS.to_string(),
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}
