//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services and remain testable with mocked ports.

use crate::domain::PrescriptionDispatcher;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub prescriptions: PrescriptionDispatcher,
}

impl HttpState {
    pub fn new(prescriptions: PrescriptionDispatcher) -> Self {
        Self { prescriptions }
    }
}
