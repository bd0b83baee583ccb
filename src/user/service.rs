use std::sync::Arc;

use log::info;
use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::create_token;
use crate::user::model::{LoginRequest, SignupRequest, User};
use crate::user::repository::UserRepository;
use crate::utils::error::CustomError;
use crate::utils::hashing::{self, DEFAULT_COST};
use crate::utils::validation::{is_valid_email, validate_password};

pub struct LoginResult {
    pub token: String,
    pub user_id: ObjectId,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    hash_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: String) -> Self {
        UserService {
            users,
            jwt_secret,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Builder: bcrypt cost used for new password hashes
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<ObjectId, CustomError> {
        let email = request.email.trim().to_lowercase();
        let name = request.name.trim().to_string();

        if !is_valid_email(&email) {
            return Err(CustomError::ValidationError(
                "Please enter a valid email.".into(),
            ));
        }
        validate_password(&request.password)?;
        if name.is_empty() {
            return Err(CustomError::ValidationError("Name must not be empty.".into()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(CustomError::ValidationError(
                "E-Mail address already exists!".into(),
            ));
        }

        let hashed_password = hashing::hash_password(request.password.trim(), self.hash_cost)
            .map_err(|e| CustomError::InternalServerError(format!("Hashing failed: {}", e)))?;

        let user = User::new(email, hashed_password, name);
        self.users.insert(&user).await?;

        info!("Registered user {}", user.id);
        Ok(user.id)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResult, CustomError> {
        let email = request.email.trim().to_lowercase();

        let user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            CustomError::UnauthenticatedError("A user with this email could not be found.".into())
        })?;

        let matches = hashing::verify_password(request.password.trim(), &user.password)
            .map_err(|e| CustomError::InternalServerError(format!("Hash check failed: {}", e)))?;
        if !matches {
            return Err(CustomError::UnauthenticatedError("Wrong password!".into()));
        }

        let token = create_token(&user.id.to_hex(), &user.email, &self.jwt_secret)?;
        Ok(LoginResult {
            token,
            user_id: user.id,
        })
    }

    pub async fn get_status(&self, user_id: ObjectId) -> Result<String, CustomError> {
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("User not found.".into()))?;
        Ok(user.status)
    }

    pub async fn update_status(&self, user_id: ObjectId, status: &str) -> Result<(), CustomError> {
        let status = status.trim();
        if status.is_empty() {
            return Err(CustomError::ValidationError("Status must not be empty.".into()));
        }

        if !self.users.update_status(&user_id, status).await? {
            return Err(CustomError::NotFoundError("User not found.".into()));
        }
        Ok(())
    }
}
