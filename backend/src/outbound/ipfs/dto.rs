//! DTOs for decoding IPFS HTTP API responses.

use serde::Deserialize;

use crate::domain::ContentHash;

/// Body of a successful `/api/v0/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct AddResponseDto {
    pub(super) hash: String,
    #[serde(default)]
    pub(super) name: Option<String>,
}

impl AddResponseDto {
    pub(super) fn into_content_hash(self) -> Result<ContentHash, String> {
        ContentHash::new(self.hash.clone())
            .map_err(|error| format!("invalid hash {:?}: {error}", self.hash))
    }
}

/// Error envelope returned by the IPFS API on failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ApiErrorDto {
    pub(super) message: String,
}
