//! Driven port for the prescription mail relay, as seen from the portal side.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::define_port_error;

/// Body of `POST /send-prescription`.
///
/// Fields default to empty so that a missing field and a blank one are
/// rejected with the same message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PrescriptionRequest {
    #[schema(example = "Jane")]
    pub patient_name: String,
    #[schema(example = "Flu")]
    pub diagnosis: String,
    #[schema(example = "Paracetamol")]
    pub medicines: String,
    #[schema(example = "a@b.com")]
    pub email: String,
}

impl PrescriptionRequest {
    /// `true` when every field carries a non-blank value.
    pub fn is_complete(&self) -> bool {
        [
            &self.patient_name,
            &self.diagnosis,
            &self.medicines,
            &self.email,
        ]
        .iter()
        .all(|value| !value.trim().is_empty())
    }
}

define_port_error! {
    /// Errors raised while calling the relay.
    pub enum PrescriptionRelayError {
        /// The relay answered with a 4xx or 5xx status.
        Rejected { status: u16, message: String } =>
            "relay rejected request with status {status}: {message}",
        /// The relay could not be reached.
        Transport { message: String } => "relay transport failed: {message}",
        /// The relay's response body was not understood.
        Decode { message: String } => "relay response decode failed: {message}",
    }
}

/// Client of the mail relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrescriptionRelay: Send + Sync {
    /// Submit a prescription and return the relay's confirmation message.
    async fn send(&self, request: &PrescriptionRequest) -> Result<String, PrescriptionRelayError>;
}
