use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{Collection, Database};

use crate::user::model::User;
use crate::utils::error::CustomError;

/// Access to the `users` collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), CustomError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError>;

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, CustomError>;

    /// Adds `post_id` to the user's post set. Returns false if the user does not exist.
    async fn add_post(&self, user_id: &ObjectId, post_id: &ObjectId) -> Result<bool, CustomError>;

    /// Removes `post_id` from the user's post set. Returns false if the user does not exist.
    async fn remove_post(&self, user_id: &ObjectId, post_id: &ObjectId)
    -> Result<bool, CustomError>;

    async fn update_status(&self, user_id: &ObjectId, status: &str) -> Result<bool, CustomError>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<User>("users");
        MongoUserRepository { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), CustomError> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, CustomError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, CustomError> {
        let cursor = self.collection.find(doc! { "_id": { "$in": ids.to_vec() } }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn add_post(&self, user_id: &ObjectId, post_id: &ObjectId) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *user_id },
                doc! {
                    "$addToSet": { "posts": *post_id },
                    "$set": { "updatedAt": bson::DateTime::now() },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn remove_post(
        &self,
        user_id: &ObjectId,
        post_id: &ObjectId,
    ) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *user_id },
                doc! {
                    "$pull": { "posts": *post_id },
                    "$set": { "updatedAt": bson::DateTime::now() },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn update_status(&self, user_id: &ObjectId, status: &str) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *user_id },
                doc! { "$set": { "status": status, "updatedAt": bson::DateTime::now() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
