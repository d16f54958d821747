#[cfg(feature = "server")]
use std::net::TcpListener;
#[cfg(feature = "server")]
use std::sync::Arc;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::dev::Server;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::mailer::{QuoteMailer, mailer_from_config};
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::services::quote::email_templates;

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod mailer;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "data")]
pub mod wizard;

#[cfg(feature = "server")]
fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600),
        None => Cors::permissive(),
    }
}

/// Starts the HTTP server on an already bound listener with the given mail
/// relay. The returned server must be awaited or spawned.
#[cfg(feature = "server")]
pub fn serve(
    listener: TcpListener,
    mailer: Arc<dyn QuoteMailer>,
    server_config: &ServerConfig,
) -> std::io::Result<Server> {
    let tera = email_templates()
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let tera = web::Data::new(tera);
    let mailer: web::Data<dyn QuoteMailer> = web::Data::from(mailer);
    let limits = web::Data::new(server_config.limits());
    let allowed_origin = server_config.allowed_origin.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(middleware::Logger::default())
            .app_data(tera.clone())
            .app_data(mailer.clone())
            .app_data(limits.clone())
            .configure(routes::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let mailer = mailer_from_config(&server_config.mail())
        .map_err(|e| std::io::Error::other(format!("Failed to set up the mailer: {e}")))?;

    let listener = TcpListener::bind((server_config.address.as_str(), server_config.port))?;
    log::info!("Listening on {}", listener.local_addr()?);

    serve(listener, mailer, &server_config)?.await
}
