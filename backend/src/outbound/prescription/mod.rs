//! Relay-side adapters: PDF rendering, spool directory, and SMTP delivery.

mod pdf;
mod smtp;
mod spool;

pub use pdf::PdfPrescriptionRenderer;
pub use smtp::{SmtpMailerConfig, SmtpPrescriptionMailer};
pub use spool::DirPrescriptionSpool;
