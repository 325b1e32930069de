//! HTTP inbound adapter exposing the relay endpoints.

pub mod error;
pub mod health;
pub mod prescriptions;
pub mod state;

pub use error::ApiResult;
