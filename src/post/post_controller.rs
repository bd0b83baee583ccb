use crate::middleware::auth::get_user_id_from_request;
use crate::post::post_model::{PageQuery, PostForm};
use crate::post::post_service::PostService;
use crate::utils::error::CustomError;
use crate::utils::uploads::FileUpload;
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use serde_json::json;

/// Upper bound on a single multipart field held in memory.
const MAX_FIELD_SIZE: usize = 10 * 1024 * 1024;

/// Reads title, content and image (file or stored path) from a multipart body.
async fn extract_post_form(mut payload: Multipart) -> Result<PostForm, CustomError> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            CustomError::ValidationError(format!("Error reading multipart field: {}", e))
        })?;

        let (field_name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or("").to_string(),
                cd.get_filename()
                    .filter(|f| !f.is_empty())
                    .map(|f| f.to_string()),
            ),
            None => continue,
        };
        let content_type = field.content_type().map(|ct| ct.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                CustomError::ValidationError(format!("Error reading multipart field: {}", e))
            })?;
            if data.len() + chunk.len() > MAX_FIELD_SIZE {
                return Err(CustomError::ValidationError(format!(
                    "Field '{}' exceeds {} bytes",
                    field_name, MAX_FIELD_SIZE
                )));
            }
            data.extend_from_slice(&chunk);
        }

        match (field_name.as_str(), file_name) {
            ("image", Some(file_name)) => {
                form.image_file = Some(FileUpload::new(file_name, data, content_type));
            }
            ("image", None) => form.image_path = Some(String::from_utf8_lossy(&data).into_owned()),
            ("title", _) => form.input.title = String::from_utf8_lossy(&data).into_owned(),
            ("content", _) => form.input.content = String::from_utf8_lossy(&data).into_owned(),
            _ => {}
        }
    }

    Ok(form)
}

/// GET /feed/posts?page=N
pub async fn get_posts(
    post_service: web::Data<PostService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, CustomError> {
    let page = post_service.list_posts(query.page.unwrap_or(1)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Fetched all posts",
        "posts": page.posts,
        "totalItems": page.total_items,
    })))
}

/// POST /feed/post
pub async fn create_post(
    req: HttpRequest,
    post_service: web::Data<PostService>,
    payload: Multipart,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let form = extract_post_form(payload).await?;

    let created = post_service.create_post(user_id, form).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Post Created successfully!",
        "post": created.post,
        "creator": created.creator,
    })))
}

/// GET /feed/post/{postId}
pub async fn get_post(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let post = post_service.get_post(&post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post Fetched",
        "post": post,
    })))
}

/// PUT /feed/post/{postId}
pub async fn update_post(
    req: HttpRequest,
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
    payload: Multipart,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let form = extract_post_form(payload).await?;

    let post = post_service
        .update_post(user_id, &post_id.into_inner(), form)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post Updated",
        "post": post,
    })))
}

/// DELETE /feed/post/{postId}
pub async fn delete_post(
    req: HttpRequest,
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    post_service.delete_post(user_id, &post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post deleted successfully",
    })))
}
