//! HTTP server configuration object.

use std::net::SocketAddr;

use ehr_backend::domain::PrescriptionDispatcher;

/// Everything `create_server` needs to start listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) dispatcher: PrescriptionDispatcher,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, dispatcher: PrescriptionDispatcher) -> Self {
        Self {
            bind_addr,
            dispatcher,
        }
    }
}
