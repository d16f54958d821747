use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, web};

use crate::routes::error_response;
use crate::services::wizard::{list_project_types, wizard_config as load_wizard_config};

#[get("/quote/project-types")]
pub async fn project_types() -> impl Responder {
    HttpResponse::Ok().json(list_project_types())
}

#[get("/quote/config/{project_type}")]
pub async fn wizard_config(path: web::Path<String>) -> impl Responder {
    let tag = path.into_inner();
    match load_wizard_config(&tag) {
        Ok(config) => HttpResponse::Ok().json(config),
        Err(err) => {
            log::warn!("Wizard config requested for {tag}: {err}");
            error_response(StatusCode::NOT_FOUND, "Nepoznat tip projekta.")
        }
    }
}
