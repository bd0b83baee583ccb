use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::post::post_model::Post;
use crate::utils::error::CustomError;

/// Access to the `posts` collection.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn count(&self) -> Result<u64, CustomError>;

    /// Posts ordered newest first, skipping `skip` and returning at most `limit`.
    async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError>;

    async fn insert(&self, post: &Post) -> Result<(), CustomError>;

    /// Replaces the stored document with `post`. Returns false if it no longer exists.
    async fn replace(&self, post: &Post) -> Result<bool, CustomError>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError>;
}

pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Post>("posts");
        MongoPostRepository { collection }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn count(&self) -> Result<u64, CustomError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn find_page(&self, skip: u64, limit: i64) -> Result<Vec<Post>, CustomError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Post>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert(&self, post: &Post) -> Result<(), CustomError> {
        self.collection.insert_one(post).await?;
        Ok(())
    }

    async fn replace(&self, post: &Post) -> Result<bool, CustomError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": post.id }, post)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, CustomError> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
