use bcrypt::{BcryptError, hash, verify};

pub use bcrypt::DEFAULT_COST;

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    verify(password, hashed)
}
