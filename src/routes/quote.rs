use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, post, web};
use chrono::Local;
use log::error;
use tera::Tera;

use crate::dto::quote::QuoteResponse;
use crate::forms::quote::{AttachmentLimits, QuoteUpload};
use crate::mailer::QuoteMailer;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::quote::{
    self, INVALID_DATA_MESSAGE, MISSING_DATA_MESSAGE, NOT_CONFIGURED_MESSAGE, SEND_FAILED_MESSAGE,
};

#[post("/quote")]
pub async fn submit_quote(
    payload: Multipart,
    mailer: web::Data<dyn QuoteMailer>,
    tera: web::Data<Tera>,
    limits: web::Data<AttachmentLimits>,
) -> impl Responder {
    let upload = match QuoteUpload::read(payload, **limits).await {
        Ok(upload) => upload,
        Err(err) if err.is_too_large() => {
            error!("Rejected quote upload: {err}");
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                &quote::too_large_message(&limits),
            );
        }
        Err(err) => {
            error!("Failed to read quote upload: {err}");
            return error_response(StatusCode::BAD_REQUEST, INVALID_DATA_MESSAGE);
        }
    };

    let mailer = mailer.into_inner();
    let tera = tera.into_inner();
    let now = Local::now().naive_local();

    let result = web::block(move || quote::submit_quote(&*mailer, &tera, upload, now)).await;

    match result {
        Ok(Ok(ack)) => HttpResponse::Ok().json(QuoteResponse {
            success: true,
            message: ack.message,
        }),
        Ok(Err(err)) => service_error_response(err),
        Err(err) => {
            error!("Quote email task failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED_MESSAGE)
        }
    }
}

fn service_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::MissingData => error_response(StatusCode::BAD_REQUEST, MISSING_DATA_MESSAGE),
        ServiceError::InvalidData(reason) => {
            error!("Invalid quote data: {reason}");
            error_response(StatusCode::BAD_REQUEST, INVALID_DATA_MESSAGE)
        }
        ServiceError::MailNotConfigured => {
            error!("SMTP not configured");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, NOT_CONFIGURED_MESSAGE)
        }
        err => {
            error!("Quote API error: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED_MESSAGE)
        }
    }
}
