//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_dispatcher;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use ehr_backend::Trace;
#[cfg(debug_assertions)]
use ehr_backend::doc::ApiDoc;
use ehr_backend::inbound::http::health::{HealthState, live, ready};
use ehr_backend::inbound::http::prescriptions::{json_config, send_prescription};
use ehr_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Construct the relay's HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        dispatcher,
    } = config;
    let http_state = web::Data::new(HttpState::new(dispatcher));

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .app_data(json_config())
            .service(send_prescription)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        // The portal front end is served from a different origin.
        app.wrap(Trace).wrap(Cors::permissive())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
