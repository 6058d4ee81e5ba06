// Route exports
pub mod matches;

use actix_web::{error, web, HttpRequest, HttpResponse};
use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure),
    );
}

fn bad_request(error: &str, message: String, cause: impl std::fmt::Debug + std::fmt::Display + 'static) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    });
    error::InternalError::from_response(cause, response).into()
}

/// Render JSON body extraction failures as an `ErrorResponse`
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let message = format!("Invalid JSON: {}", err);
    bad_request("invalid_json", message, err)
}

/// Render query string extraction failures as an `ErrorResponse`
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Invalid query: {}", err);
    bad_request("invalid_query", message, err)
}
