use crate::middleware::auth::get_user_id_from_request;
use crate::user::model::{LoginRequest, SignupRequest, StatusRequest};
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

/// PUT /auth/signup
pub async fn signup(
    user_service: web::Data<UserService>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = user_service.signup(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User created!",
        "userId": user_id.to_hex(),
    })))
}

/// POST /auth/login
pub async fn login(
    user_service: web::Data<UserService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    let result = user_service.login(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "token": result.token,
        "userId": result.user_id.to_hex(),
    })))
}

/// GET /auth/status
pub async fn get_status(
    req: HttpRequest,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let status = user_service.get_status(user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": status,
    })))
}

/// PATCH /auth/status
pub async fn update_status(
    req: HttpRequest,
    user_service: web::Data<UserService>,
    body: web::Json<StatusRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    user_service.update_status(user_id, &body.status).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User updated.",
    })))
}
