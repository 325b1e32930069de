//! Wires relay adapters into the prescription dispatcher.

use std::io;
use std::sync::Arc;

use tracing::info;

use ehr_backend::domain::PrescriptionDispatcher;
use ehr_backend::outbound::prescription::{
    DirPrescriptionSpool, PdfPrescriptionRenderer, SmtpPrescriptionMailer,
};
use ehr_backend::settings::RelaySettings;

/// Build the dispatcher from loaded settings.
///
/// # Errors
/// Fails when the spool directory cannot be created or the SMTP settings are
/// incomplete or malformed.
pub fn build_dispatcher(settings: &RelaySettings) -> io::Result<PrescriptionDispatcher> {
    let spool = DirPrescriptionSpool::open(settings.spool_dir())?;
    let mailer_config = settings.mailer_config().map_err(io::Error::other)?;
    let mailer = SmtpPrescriptionMailer::new(&mailer_config).map_err(io::Error::other)?;
    info!(
        spool = %spool.root().display(),
        relay = %mailer_config.relay,
        "prescription relay configured"
    );
    Ok(PrescriptionDispatcher::new(
        Arc::new(PdfPrescriptionRenderer),
        Arc::new(spool),
        Arc::new(mailer),
    ))
}
