use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{Result, dev::ServiceResponse};

use super::error_handler::{is_custom_error, replace_body};

/// Unmatched routes; 404s raised by handlers pass through untouched.
pub fn not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if is_custom_error(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    replace_body(res, "Route does not exist", "NOT_FOUND_ERROR")
}
