#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId};

use social_feed_api::config::AppConfig;
use social_feed_api::middleware::auth::create_token;
use social_feed_api::post::post_model::Post;
use social_feed_api::post::post_repository::PostRepository;
use social_feed_api::post::post_service::PostService;
use social_feed_api::realtime::broadcaster::EventBroadcaster;
use social_feed_api::user::model::User;
use social_feed_api::user::repository::UserRepository;
use social_feed_api::user::service::UserService;
use social_feed_api::utils::error::CustomError;
use social_feed_api::utils::uploads::ImageStorage;

pub const JWT_SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "----feedtestboundary";

#[derive(Default)]
pub struct InMemoryPostRepository {
    pub posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn all(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<Post> {
        self.all().into_iter().find(|p| p.id.to_hex() == id)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.posts.lock().unwrap().len() as u64)
    }

    async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, CustomError> {
        let mut posts = self.all();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(posts
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.all().into_iter().find(|p| p.id == *id))
    }

    async fn insert(&self, post: &Post) -> Result<(), CustomError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn replace(&self, post: &Post) -> Result<bool, CustomError> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != *id);
        Ok(posts.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<HashMap<ObjectId, User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, id: &ObjectId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), CustomError> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, CustomError> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn add_post(&self, user_id: &ObjectId, post_id: &ObjectId) -> Result<bool, CustomError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(user_id) {
            Some(user) => {
                if !user.posts.contains(post_id) {
                    user.posts.push(*post_id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_post(
        &self,
        user_id: &ObjectId,
        post_id: &ObjectId,
    ) -> Result<bool, CustomError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(user_id) {
            Some(user) => {
                user.posts.retain(|p| p != post_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_status(&self, user_id: &ObjectId, status: &str) -> Result<bool, CustomError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(user_id) {
            Some(user) => {
                user.status = status.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Captures every emitted event in order.
#[derive(Default)]
pub struct RecordingBroadcaster {
    pub events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingBroadcaster {
    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.lock().unwrap().clone()
    }
}

impl EventBroadcaster for RecordingBroadcaster {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
    }
}

pub struct TestContext {
    pub posts: Arc<InMemoryPostRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub events: Arc<RecordingBroadcaster>,
    pub upload_dir: tempfile::TempDir,
    pub config: AppConfig,
}

impl TestContext {
    pub fn new() -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            mongodb_uri: "mongodb://unused".into(),
            database_name: "unused".into(),
            jwt_secret: JWT_SECRET.into(),
            upload_dir: upload_dir.path().to_path_buf(),
        };

        TestContext {
            posts: Arc::new(InMemoryPostRepository::default()),
            users: Arc::new(InMemoryUserRepository::default()),
            events: Arc::new(RecordingBroadcaster::default()),
            upload_dir,
            config,
        }
    }

    pub fn images(&self) -> ImageStorage {
        ImageStorage::new(self.upload_dir.path())
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(
            self.posts.clone(),
            self.users.clone(),
            self.images(),
            self.events.clone(),
        )
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.users.clone(), JWT_SECRET.into()).with_hash_cost(4)
    }

    /// Inserts a user and returns its id plus a valid bearer token.
    pub fn add_user(&self, name: &str) -> (ObjectId, String) {
        let user = User::new(
            format!("{}@example.com", name.to_lowercase()),
            "unused-hash".into(),
            name.into(),
        );
        let id = user.id;
        self.users.users.lock().unwrap().insert(id, user);
        (id, token_for(&id))
    }

    /// Stores a post directly, bypassing the API, with a given age in seconds.
    pub fn seed_post(&self, creator: ObjectId, title: &str, age_secs: i64) -> Post {
        let mut post = Post::new(
            title.into(),
            "content".into(),
            format!("images/{}.png", title),
            creator,
        );
        let created =
            bson::DateTime::from_millis(bson::DateTime::now().timestamp_millis() - age_secs * 1000);
        post.created_at = created;
        post.updated_at = created;
        self.posts.posts.lock().unwrap().push(post.clone());
        if let Some(user) = self.users.users.lock().unwrap().get_mut(&creator) {
            user.posts.push(post.id);
        }
        post
    }

    pub fn path_of(&self, image_url: &str) -> PathBuf {
        self.upload_dir.path().join(image_url)
    }
}

pub fn token_for(id: &ObjectId) -> String {
    create_token(&id.to_hex(), "someone@example.com", JWT_SECRET).unwrap()
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    )
}

/// Multipart form body with text fields and an optional `image` file.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, data)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    )
}

/// Background image deletion is detached; give it a moment to land.
pub async fn wait_until_removed(path: &Path) -> bool {
    for _ in 0..100 {
        if !path.exists() {
            return true;
        }
        actix_web::rt::time::sleep(Duration::from_millis(10)).await;
    }
    !path.exists()
}

/// Builds the full application over the context's in-memory collaborators.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.config.clone()))
                .app_data(actix_web::web::Data::new($ctx.post_service()))
                .app_data(actix_web::web::Data::new($ctx.user_service()))
                .app_data(actix_web::web::Data::new($ctx.images()))
                .configure(social_feed_api::router::index::routes)
                .wrap(social_feed_api::middleware::error_handler::error_handlers()),
        )
        .await
    };
}
