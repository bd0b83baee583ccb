use std::collections::HashMap;
use std::sync::Arc;

use log::{error, info, warn};
use mongodb::bson::{self, oid::ObjectId};

use crate::post::post_model::{CreatorSummary, Post, PostForm, PostPage, PostResponse};
use crate::post::post_repository::PostRepository;
use crate::realtime::broadcaster::EventBroadcaster;
use crate::realtime::model::{POSTS_TOPIC, PostEvent};
use crate::user::model::User;
use crate::user::repository::UserRepository;
use crate::utils::error::CustomError;
use crate::utils::uploads::{FileUpload, FileValidator, ImageStorage};
use crate::utils::validation::validate_post_input;

pub const POSTS_PER_PAGE: u64 = 2;

const POST_NOT_FOUND: &str = "Could not find post!";
const NOT_AUTHORIZED: &str = "Not authorized";

/// Image reference resolved from an update request.
enum ImageSource {
    Upload(FileUpload),
    Existing(String),
}

/// Result of a successful create.
#[derive(Debug)]
pub struct CreatedPost {
    pub post: PostResponse,
    pub creator: CreatorSummary,
}

/// Post lifecycle: validation, ownership checks, image housekeeping and event fan-out.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    images: ImageStorage,
    validator: FileValidator,
    events: Arc<dyn EventBroadcaster>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        images: ImageStorage,
        events: Arc<dyn EventBroadcaster>,
    ) -> Self {
        PostService {
            posts,
            users,
            images,
            validator: FileValidator::images(),
            events,
        }
    }

    pub fn with_validator(mut self, validator: FileValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Applies the image filter: wrong types count as no file, oversized files are rejected.
    fn accept_image(&self, file: Option<FileUpload>) -> Result<Option<FileUpload>, CustomError> {
        let Some(file) = file else {
            return Ok(None);
        };
        if !self.validator.accepts_type(&file) {
            warn!(
                "Ignoring upload {} with unsupported type {:?}",
                file.file_name, file.content_type
            );
            return Ok(None);
        }
        self.validator
            .validate_size(&file)
            .map_err(CustomError::ValidationError)?;
        Ok(Some(file))
    }

    fn broadcast(&self, event: PostEvent) {
        match serde_json::to_value(&event) {
            Ok(payload) => self.events.emit(POSTS_TOPIC, payload),
            Err(e) => error!("Failed to serialize post event: {}", e),
        }
    }

    pub async fn list_posts(&self, page: u64) -> Result<PostPage, CustomError> {
        let total_items = self.posts.count().await?;

        // Pages past what the store can address are simply empty.
        let skip = match page.saturating_sub(1).checked_mul(POSTS_PER_PAGE) {
            Some(skip) if skip < total_items && skip <= i64::MAX as u64 => skip,
            _ => {
                return Ok(PostPage {
                    posts: Vec::new(),
                    total_items,
                });
            }
        };
        let posts = self.posts.find_page(skip, POSTS_PER_PAGE as i64).await?;

        let mut creator_ids: Vec<ObjectId> = posts.iter().map(|p| p.creator).collect();
        creator_ids.sort();
        creator_ids.dedup();
        let creators: HashMap<ObjectId, CreatorSummary> = self
            .users
            .find_by_ids(&creator_ids)
            .await?
            .iter()
            .map(|u| (u.id, CreatorSummary::from(u)))
            .collect();

        let posts = posts
            .iter()
            .map(|p| match creators.get(&p.creator) {
                Some(creator) => PostResponse::with_creator(p, creator.clone()),
                None => PostResponse::from(p),
            })
            .collect();

        Ok(PostPage { posts, total_items })
    }

    pub async fn create_post(
        &self,
        user_id: ObjectId,
        form: PostForm,
    ) -> Result<CreatedPost, CustomError> {
        let input = validate_post_input(form.input)?;
        let image = self
            .accept_image(form.image_file)?
            .ok_or_else(|| CustomError::ValidationError("Could not find image!".into()))?;

        let image_url = self.images.save(&image).await?;
        let post = Post::new(input.title, input.content, image_url, user_id);

        if let Err(e) = self.posts.insert(&post).await {
            self.images.clear_image(&post.image_url);
            return Err(e);
        }

        let creator = match self.attach_to_creator(&post).await {
            Ok(creator) => creator,
            Err(e) => {
                self.rollback_create(&post).await;
                return Err(e);
            }
        };

        let created = CreatedPost {
            post: PostResponse::from(&post),
            creator: CreatorSummary::from(&creator),
        };
        self.broadcast(PostEvent::Create {
            post: PostResponse::with_creator(&post, created.creator.clone()),
        });

        info!("User {} created post {}", user_id, post.id);
        Ok(created)
    }

    async fn attach_to_creator(&self, post: &Post) -> Result<User, CustomError> {
        let creator = self
            .users
            .find_by_id(&post.creator)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Could not find user!".into()))?;

        if !self.users.add_post(&creator.id, &post.id).await? {
            return Err(CustomError::NotFoundError("Could not find user!".into()));
        }
        Ok(creator)
    }

    async fn rollback_create(&self, post: &Post) {
        warn!("Rolling back post {} after creator update failed", post.id);
        if let Err(e) = self.posts.delete(&post.id).await {
            error!("Failed to roll back post {}: {}", post.id, e);
        }
        self.images.clear_image(&post.image_url);
    }

    pub async fn get_post(&self, post_id: &str) -> Result<PostResponse, CustomError> {
        let post = self
            .find_post(post_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError(POST_NOT_FOUND.into()))?;
        Ok(PostResponse::from(&post))
    }

    pub async fn update_post(
        &self,
        user_id: ObjectId,
        post_id: &str,
        form: PostForm,
    ) -> Result<PostResponse, CustomError> {
        let input = validate_post_input(form.input)?;
        let image = match self.accept_image(form.image_file)? {
            Some(file) => ImageSource::Upload(file),
            None => match form.image_path.filter(|p| !p.trim().is_empty()) {
                Some(path) => ImageSource::Existing(path.trim().to_string()),
                None => return Err(CustomError::ValidationError("No file picked!".into())),
            },
        };
        if let ImageSource::Existing(path) = &image {
            if self.images.resolve(path).is_none() {
                return Err(CustomError::ValidationError("Invalid image path!".into()));
            }
        }

        // A missing post is reported as 422 here, unlike read and delete.
        let mut post = self
            .find_post(post_id)
            .await?
            .ok_or_else(|| CustomError::ValidationError("No post found!".into()))?;

        if post.creator != user_id {
            return Err(CustomError::ForbiddenError(NOT_AUTHORIZED.into()));
        }

        let (image_url, uploaded) = match image {
            ImageSource::Upload(file) => (self.images.save(&file).await?, true),
            ImageSource::Existing(path) => (path, false),
        };

        let previous_image = std::mem::replace(&mut post.image_url, image_url);
        post.title = input.title;
        post.content = input.content;
        post.updated_at = bson::DateTime::now();

        let persisted = match self.posts.replace(&post).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CustomError::ValidationError("No post found!".into())),
            Err(e) => Err(e),
        };
        if let Err(e) = persisted {
            if uploaded {
                self.images.clear_image(&post.image_url);
            }
            return Err(e);
        }

        if previous_image != post.image_url {
            self.images.clear_image(&previous_image);
        }

        let updated = PostResponse::from(&post);
        self.broadcast(PostEvent::Update {
            post: updated.clone(),
        });

        info!("User {} updated post {}", user_id, post.id);
        Ok(updated)
    }

    pub async fn delete_post(&self, user_id: ObjectId, post_id: &str) -> Result<(), CustomError> {
        let post = self
            .find_post(post_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError(POST_NOT_FOUND.into()))?;

        if post.creator != user_id {
            return Err(CustomError::ForbiddenError(NOT_AUTHORIZED.into()));
        }

        self.images.clear_image(&post.image_url);

        if !self.posts.delete(&post.id).await? {
            return Err(CustomError::NotFoundError(POST_NOT_FOUND.into()));
        }

        if !self.users.remove_post(&post.creator, &post.id).await? {
            warn!("Creator {} of deleted post {} no longer exists", post.creator, post.id);
        }

        self.broadcast(PostEvent::Delete {
            post: post.id.to_hex(),
        });

        info!("User {} deleted post {}", user_id, post.id);
        Ok(())
    }

    /// Malformed ids cannot match any document and are treated as absent.
    async fn find_post(&self, post_id: &str) -> Result<Option<Post>, CustomError> {
        match ObjectId::parse_str(post_id) {
            Ok(id) => self.posts.find_by_id(&id).await,
            Err(_) => Ok(None),
        }
    }
}
