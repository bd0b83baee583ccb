use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Unauthenticated: {0}")]
    UnauthenticatedError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl CustomError {
    /// Message shown to the client, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            CustomError::ValidationError(msg)
            | CustomError::ForbiddenError(msg)
            | CustomError::NotFoundError(msg)
            | CustomError::UnauthenticatedError(msg)
            | CustomError::InternalServerError(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::ForbiddenError(..) => "FORBIDDEN_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::UnauthenticatedError(..) => "UNAUTHENTICATED_ERROR",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<mongodb::error::Error> for CustomError {
    fn from(err: mongodb::error::Error) -> Self {
        log::error!("Document store failure: {}", err);
        CustomError::InternalServerError("Document store operation failed".into())
    }
}

impl From<std::io::Error> for CustomError {
    fn from(err: std::io::Error) -> Self {
        log::error!("Filesystem failure: {}", err);
        CustomError::InternalServerError("File operation failed".into())
    }
}

/// Builds the uniform JSON error body shared by every failing response.
pub fn error_body(status: StatusCode, message: &str, error: &str) -> serde_json::Value {
    json!({
        "success": false,
        "message": message,
        "statusCode": status.as_u16(),
        "error": error,
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    })
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::ValidationError(..) => StatusCode::UNPROCESSABLE_ENTITY,
            CustomError::ForbiddenError(..) => StatusCode::FORBIDDEN,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::UnauthenticatedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(error_body(status, self.message(), self.error_code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(
            CustomError::ValidationError("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            CustomError::ForbiddenError("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            CustomError::NotFoundError("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CustomError::InternalServerError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn error_response_carries_raw_message() {
        let resp = CustomError::NotFoundError("Could not find post!".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Could not find post!");
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["error"], "NOT_FOUND_ERROR");
    }
}
