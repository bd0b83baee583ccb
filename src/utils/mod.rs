pub mod error;
pub mod hashing;
pub mod uploads;
pub mod validation;
