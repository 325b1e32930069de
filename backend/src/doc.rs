//! OpenAPI document for the relay's HTTP surface.
//!
//! Served through Swagger UI in debug builds and printed by the
//! `openapi-dump` binary for front-end tooling.

use utoipa::OpenApi;

use crate::domain::ports::PrescriptionRequest;
use crate::inbound::http::prescriptions::MessageResponse;

/// OpenAPI document for the relay API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "EHR prescription relay",
        description = "Renders prescriptions as PDF and mails them to patients."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::prescriptions::send_prescription,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(PrescriptionRequest, MessageResponse)),
    tags(
        (name = "prescriptions", description = "Prescription delivery"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
