use std::path::{Component, Path, PathBuf};

use log::{info, warn};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::utils::error::CustomError;

/// Directory, relative to the upload root, holding post images.
pub const IMAGES_DIR: &str = "images";

// ============================================
// File Upload & Validation Structs
// ============================================

/// Represents a file received in a multipart request
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(file_name: String, data: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            file_name,
            data,
            content_type,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }
}

/// File validation configuration
#[derive(Debug, Clone)]
pub struct FileValidator {
    /// Accepted MIME types (e.g., ["image/png"])
    pub allowed_content_types: Vec<String>,
    /// Accepted extensions, used when the client sent no content type
    pub allowed_extensions: Vec<String>,
    /// Maximum file size in bytes
    pub max_file_size: usize,
}

impl FileValidator {
    /// Post images: png, jpg and jpeg up to 10MB
    pub fn images() -> Self {
        Self {
            allowed_content_types: vec![
                "image/png".to_string(),
                "image/jpg".to_string(),
                "image/jpeg".to_string(),
            ],
            allowed_extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            max_file_size: 10 * 1024 * 1024,
        }
    }

    /// Builder: Set max file size in bytes
    pub fn with_max_size(mut self, size_bytes: usize) -> Self {
        self.max_file_size = size_bytes;
        self
    }

    /// Whether the file passes the type filter. Rejected files are treated as absent.
    pub fn accepts_type(&self, file: &FileUpload) -> bool {
        match &file.content_type {
            Some(ct) => self.allowed_content_types.iter().any(|a| a == ct),
            None => file
                .extension()
                .is_some_and(|ext| self.allowed_extensions.contains(&ext)),
        }
    }

    pub fn validate_size(&self, file: &FileUpload) -> Result<(), String> {
        if file.data.is_empty() {
            return Err("File is empty".to_string());
        }
        if file.size() > self.max_file_size {
            return Err(format!(
                "File too large. Maximum size: {} bytes, file size: {} bytes",
                self.max_file_size,
                file.size()
            ));
        }
        Ok(())
    }
}

// ============================================
// Local image storage
// ============================================

/// Stores post images on local disk under `<base_dir>/images`.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    base_dir: PathBuf,
}

impl ImageStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.base_dir.join(IMAGES_DIR)
    }

    pub async fn init(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.images_dir()).await
    }

    /// Writes the upload to disk and returns its relative path (`images/<name>`).
    pub async fn save(&self, file: &FileUpload) -> Result<String, CustomError> {
        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(&file.file_name));
        tokio::fs::create_dir_all(self.images_dir()).await?;
        tokio::fs::write(self.images_dir().join(&file_name), &file.data).await?;

        info!("Stored image {} ({} bytes)", file_name, file.size());
        Ok(format!("{}/{}", IMAGES_DIR, file_name))
    }

    /// Resolves a stored relative path against the base directory.
    /// Absolute paths and paths with `..` components resolve to nothing.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = relative.replace('\\', "/");
        let path = Path::new(&relative);
        if relative.is_empty()
            || !path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.base_dir.join(path))
    }

    /// Reads an image by bare file name from the images directory.
    pub async fn read(&self, file_name: &str) -> Option<Vec<u8>> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
            return None;
        }
        tokio::fs::read(self.images_dir().join(file_name)).await.ok()
    }

    /// Deletes a stored image in the background. Failures are only logged.
    pub fn clear_image(&self, relative: &str) -> JoinHandle<()> {
        let target = self.resolve(relative);
        let relative = relative.to_string();

        tokio::spawn(async move {
            let Some(path) = target else {
                warn!("Refusing to delete image outside upload directory: {}", relative);
                return;
            };
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Error while deleting image {}: {}", path.display(), e);
            }
        })
    }
}

fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Content type for a served image, from its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
