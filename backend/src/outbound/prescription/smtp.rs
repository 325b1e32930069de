//! SMTP mailer built on `lettre`'s tokio transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{PrescriptionDeliveryError, PrescriptionEmail, PrescriptionMailer};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Connection settings for [`SmtpPrescriptionMailer`].
#[derive(Clone)]
pub struct SmtpMailerConfig {
    /// Relay host reached over implicit TLS.
    pub relay: String,
    pub username: String,
    pub password: Zeroizing<String>,
    /// Sender address; falls back to `username` when empty.
    pub from: String,
}

/// Mails prescriptions through an authenticated SMTP relay.
pub struct SmtpPrescriptionMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpPrescriptionMailer {
    /// Build the transport. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Fails when the relay host or sender address is invalid.
    pub fn new(config: &SmtpMailerConfig) -> Result<Self, PrescriptionDeliveryError> {
        let sender = if config.from.trim().is_empty() {
            config.username.as_str()
        } else {
            config.from.as_str()
        };
        let from = sender
            .parse::<Mailbox>()
            .map_err(|error| PrescriptionDeliveryError::mail(format!("invalid sender: {error}")))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.relay)
            .map_err(|error| PrescriptionDeliveryError::mail(error.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.as_str().to_owned(),
            ))
            .build();
        Ok(Self { transport, from })
    }

    fn build_message(&self, email: PrescriptionEmail) -> Result<Message, PrescriptionDeliveryError> {
        let to = email.to.parse::<Mailbox>().map_err(|error| {
            PrescriptionDeliveryError::mail(format!("invalid recipient: {error}"))
        })?;
        let content_type = ContentType::parse(PDF_CONTENT_TYPE)
            .map_err(|error| PrescriptionDeliveryError::mail(error.to_string()))?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(email.body))
                    .singlepart(
                        Attachment::new(email.attachment_name).body(email.attachment, content_type),
                    ),
            )
            .map_err(|error| PrescriptionDeliveryError::mail(error.to_string()))
    }
}

#[async_trait]
impl PrescriptionMailer for SmtpPrescriptionMailer {
    async fn send(&self, email: PrescriptionEmail) -> Result<(), PrescriptionDeliveryError> {
        let message = self.build_message(email)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|error| PrescriptionDeliveryError::mail(error.to_string()))?;
        info!(code = %response.code(), "prescription handed to SMTP relay");
        Ok(())
    }
}
