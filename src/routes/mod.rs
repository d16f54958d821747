//! HTTP routes of the quote service, mounted under `/api`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::dto::quote::ErrorResponse;

pub mod quote;
pub mod wizard;

/// Registers every route on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(quote::submit_quote)
            .service(wizard::project_types)
            .service(wizard::wizard_config),
    );
}

/// JSON `{error}` response with the given status.
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(message))
}
