//! Driven ports used by the relay to render, stage, and mail a prescription.

use async_trait::async_trait;

use super::{PrescriptionRequest, define_port_error};

define_port_error! {
    /// Errors raised while rendering or delivering a prescription.
    pub enum PrescriptionDeliveryError {
        /// The PDF document could not be produced.
        Render { message: String } => "prescription render failed: {message}",
        /// The spool directory could not be written, read, or cleaned.
        Spool { message: String } => "prescription spool failed: {message}",
        /// The mail transport refused or failed to send.
        Mail { message: String } => "prescription mail failed: {message}",
    }
}

/// A rendered prescription staged on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpooledPrescription {
    /// File name inside the spool directory.
    pub file_name: String,
}

/// Message handed to the mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

/// Produces the prescription document.
#[cfg_attr(test, mockall::automock)]
pub trait PrescriptionRenderer: Send + Sync {
    /// Render `request` as PDF bytes.
    fn render(&self, request: &PrescriptionRequest) -> Result<Vec<u8>, PrescriptionDeliveryError>;
}

/// Transient on-disk staging for rendered documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrescriptionSpool: Send + Sync {
    /// Persist `document` under a fresh unique name.
    async fn store(&self, document: &[u8]) -> Result<SpooledPrescription, PrescriptionDeliveryError>;

    /// Read a staged document back.
    async fn load(&self, file: &SpooledPrescription) -> Result<Vec<u8>, PrescriptionDeliveryError>;

    /// Delete a staged document.
    async fn remove(&self, file: &SpooledPrescription) -> Result<(), PrescriptionDeliveryError>;
}

/// Outgoing mail transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrescriptionMailer: Send + Sync {
    async fn send(&self, email: PrescriptionEmail) -> Result<(), PrescriptionDeliveryError>;
}
