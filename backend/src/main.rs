//! Prescription relay entry point: loads settings, wires the PDF, spool and
//! SMTP adapters, and serves `POST /send-prescription`.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ehr_backend::inbound::http::health::HealthState;
use ehr_backend::settings::RelaySettings;
use server::{ServerConfig, build_dispatcher, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RelaySettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let dispatcher = build_dispatcher(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, dispatcher))?;
    info!(%bind_addr, "prescription relay listening");
    server.await
}
