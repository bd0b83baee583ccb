use std::env;
use std::path::PathBuf;

/// Runtime settings read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|_| format!("PORT must be a valid port number, got '{}'", port))?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "localhost".to_string()),
            port,
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "social_feed".to_string()),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        })
    }
}
