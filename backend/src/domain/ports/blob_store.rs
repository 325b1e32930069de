//! Driven port for the content-addressed blob store holding record payloads.

use async_trait::async_trait;

use crate::domain::ContentHash;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by blob store adapters.
    pub enum BlobStoreError {
        /// Network transport failed before receiving a response.
        Transport { message: String } => "blob store transport failed: {message}",
        /// The store answered with a failure status.
        Rejected { message: String } => "blob store rejected request: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "blob store response decode failed: {message}",
        /// No content exists for the requested hash.
        NotFound { hash: String } => "no content stored under {hash}",
    }
}

/// Content-addressed storage exposing `add` and `cat`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return the hash they are addressed by.
    async fn add(&self, bytes: &[u8]) -> Result<ContentHash, BlobStoreError>;

    /// Fetch the bytes stored under `hash`.
    async fn cat(&self, hash: &ContentHash) -> Result<Vec<u8>, BlobStoreError>;
}
