use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, Result};

use super::not_found::not_found;
use crate::utils::error::{CustomError, error_body};

/// Responses rendered by `CustomError` already carry the JSON error body.
pub(crate) fn is_custom_error<B>(res: &ServiceResponse<B>) -> bool {
    res.response()
        .error()
        .and_then(|e| e.as_error::<CustomError>())
        .is_some()
}

pub(crate) fn replace_body<B>(
    res: ServiceResponse<B>,
    message: &str,
    error: &str,
) -> Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let new_response = HttpResponse::build(status).json(error_body(status, message, error));
    let (req, _) = res.into_parts();
    let res = ServiceResponse::new(req, new_response.map_into_right_body());

    Ok(ErrorHandlerResponse::Response(res))
}

/// Rewrites framework errors (payload, query, auth extractor failures) into the uniform JSON shape
pub fn handle_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if is_custom_error(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let (message, error) = if status == StatusCode::UNAUTHORIZED {
        ("Not authenticated.".to_string(), "UNAUTHENTICATED_ERROR")
    } else if status.is_server_error() {
        (
            status.canonical_reason().unwrap_or("Unknown").to_string(),
            "INTERNAL_SERVER_ERROR",
        )
    } else {
        let message = res
            .response()
            .error()
            .map(|e| e.to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
        (message, "BAD_REQUEST_ERROR")
    };

    replace_body(res, &message, error)
}

/// Error handlers wrapping the whole app
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .default_handler(handle_error)
}
