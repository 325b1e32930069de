//! Reqwest-backed client of the prescription mail relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::domain::ports::{PrescriptionRelay, PrescriptionRelayError, PrescriptionRequest};
use crate::outbound::http_support::status_message;

const SEND_PATH: &str = "send-prescription";

/// `{ "message": ... }` body returned by the relay for every outcome.
#[derive(Debug, Deserialize)]
struct RelayMessageDto {
    message: String,
}

/// Relay client issuing `POST /send-prescription`.
pub struct RelayHttpClient {
    client: Client,
    endpoint: Url,
}

impl RelayHttpClient {
    /// Build a client for the relay rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, RelayClientBuildError> {
        let endpoint = base.join(SEND_PATH)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

/// Failure to construct a [`RelayHttpClient`].
#[derive(Debug, thiserror::Error)]
pub enum RelayClientBuildError {
    #[error("invalid relay url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
impl PrescriptionRelay for RelayHttpClient {
    async fn send(&self, request: &PrescriptionRequest) -> Result<String, PrescriptionRelayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|error| PrescriptionRelayError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| PrescriptionRelayError::transport(error.to_string()))?;
        debug!(status = status.as_u16(), "relay responded");

        if !status.is_success() {
            let message = decode_message(body.as_ref())
                .unwrap_or_else(|_| status_message(status, body.as_ref()));
            return Err(PrescriptionRelayError::rejected(status.as_u16(), message));
        }
        decode_message(body.as_ref())
    }
}

fn decode_message(body: &[u8]) -> Result<String, PrescriptionRelayError> {
    serde_json::from_slice::<RelayMessageDto>(body)
        .map(|dto| dto.message)
        .map_err(|error| {
            PrescriptionRelayError::decode(format!("invalid relay response: {error}"))
        })
}
