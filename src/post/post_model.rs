use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::user::model::User;
use crate::utils::uploads::FileUpload;

/// Post document as stored in the `posts` collection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: ObjectId,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Post {
    pub fn new(title: String, content: String, image_url: String, creator: ObjectId) -> Self {
        let now = bson::DateTime::now();
        Post {
            id: ObjectId::new(),
            title,
            content,
            image_url,
            creator,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Creator identity embedded in responses and events.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreatorSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl From<&User> for CreatorSummary {
    fn from(user: &User) -> Self {
        CreatorSummary {
            id: user.id.to_hex(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CreatorRef {
    Populated(CreatorSummary),
    Id(String),
}

/// JSON view of a post, with hex ids and RFC 3339 timestamps.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: CreatorRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn to_chrono(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

impl PostResponse {
    pub fn with_creator(post: &Post, creator: CreatorSummary) -> Self {
        let mut response = PostResponse::from(post);
        response.creator = CreatorRef::Populated(creator);
        response
    }
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        PostResponse {
            id: post.id.to_hex(),
            title: post.title.clone(),
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            creator: CreatorRef::Id(post.creator.to_hex()),
            created_at: to_chrono(post.created_at),
            updated_at: to_chrono(post.updated_at),
        }
    }
}

/// A page of posts plus the total number of posts in the store.
#[derive(Debug)]
pub struct PostPage {
    pub posts: Vec<PostResponse>,
    pub total_items: u64,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// Text fields of a create/update request after multipart parsing.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

/// Parsed multipart body of a create/update request.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub input: PostInput,
    /// `image` field sent as a file.
    pub image_file: Option<FileUpload>,
    /// `image` field sent as text: the path of an already stored image.
    pub image_path: Option<String>,
}
