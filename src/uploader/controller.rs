use actix_web::{HttpResponse, web};

use crate::utils::error::CustomError;
use crate::utils::uploads::{ImageStorage, content_type_for};

/// Serve a stored post image
/// GET /images/{filename}
pub async fn serve_image(
    file_name: web::Path<String>,
    storage: web::Data<ImageStorage>,
) -> Result<HttpResponse, CustomError> {
    let file_name = file_name.into_inner();
    let data = storage
        .read(&file_name)
        .await
        .ok_or_else(|| CustomError::NotFoundError("Image not found".into()))?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&file_name))
        .body(data))
}
