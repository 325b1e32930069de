//! Portal-side client of the prescription mail relay.

mod http_client;

pub use http_client::{RelayClientBuildError, RelayHttpClient};
