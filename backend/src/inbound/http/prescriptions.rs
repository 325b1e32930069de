//! Prescription relay endpoint.
//!
//! ```text
//! POST /send-prescription {"patientName":"Jane","diagnosis":"Flu","medicines":"Paracetamol","email":"a@b.com"}
//! ```
//!
//! Every outcome, success or failure, answers with a `{"message": ...}` body.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::error::{redact_if_internal, status_for};
use super::state::HttpState;
use crate::domain::ports::PrescriptionRequest;
use crate::domain::{Error, TRACE_ID_HEADER};

const MALFORMED_BODY_MESSAGE: &str = "All fields are required";

/// Body of every relay response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Email sent successfully!")]
    pub message: String,
}

/// Domain failure rendered in the relay's `{message}` shape.
#[derive(Debug)]
pub struct RelayFailure(Error);

impl From<Error> for RelayFailure {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl fmt::Display for RelayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for RelayFailure {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.0.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(MessageResponse {
            message: redact_if_internal(&self.0).message().to_owned(),
        })
    }
}

/// JSON extractor settings: undecodable bodies get the incomplete-request
/// answer instead of actix's plain-text error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejecting undecodable prescription body");
        RelayFailure(Error::invalid_request(MALFORMED_BODY_MESSAGE)).into()
    })
}

/// Render the prescription as a PDF and email it to the patient.
#[utoipa::path(
    post,
    path = "/send-prescription",
    request_body = PrescriptionRequest,
    responses(
        (status = 200, description = "Prescription mailed", body = MessageResponse),
        (status = 400, description = "A field is missing or blank", body = MessageResponse),
        (status = 500, description = "Rendering or delivery failed", body = MessageResponse)
    ),
    tags = ["prescriptions"],
    operation_id = "sendPrescription"
)]
#[post("/send-prescription")]
pub async fn send_prescription(
    state: web::Data<HttpState>,
    payload: web::Json<PrescriptionRequest>,
) -> Result<web::Json<MessageResponse>, RelayFailure> {
    let message = state.prescriptions.dispatch(&payload).await?;
    Ok(web::Json(MessageResponse { message }))
}
