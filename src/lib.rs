pub mod config;
pub mod database;
pub mod middleware;
pub mod post;
pub mod realtime;
pub mod router;
pub mod uploader;
pub mod user;
pub mod utils;
