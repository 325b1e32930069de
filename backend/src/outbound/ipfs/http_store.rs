//! Reqwest-backed blob store speaking the IPFS HTTP API.
//!
//! Owns transport details only: multipart upload, timeout and status
//! mapping, and decoding of the `add` response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{AddResponseDto, ApiErrorDto};
use crate::domain::ContentHash;
use crate::domain::ports::{BlobStore, BlobStoreError};
use crate::outbound::http_support::status_message;

const UPLOAD_FILE_NAME: &str = "record";

/// Blob store backed by an IPFS node's `/api/v0` endpoints.
pub struct IpfsHttpBlobStore {
    client: Client,
    api_base: Url,
}

impl IpfsHttpBlobStore {
    /// Build an adapter for the node at `api_base` (for example
    /// `http://127.0.0.1:5001/`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(api_base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_base })
    }

    fn endpoint(&self, command: &str) -> Result<Url, BlobStoreError> {
        self.api_base
            .join(&format!("api/v0/{command}"))
            .map_err(|error| BlobStoreError::transport(format!("invalid IPFS API url: {error}")))
    }
}

#[async_trait]
impl BlobStore for IpfsHttpBlobStore {
    async fn add(&self, bytes: &[u8]) -> Result<ContentHash, BlobStoreError> {
        let form = Form::new().part(
            "file",
            Part::bytes(bytes.to_vec()).file_name(UPLOAD_FILE_NAME),
        );
        let response = self
            .client
            .post(self.endpoint("add")?)
            .query(&[("pin", "true")])
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), None));
        }
        let content_hash = parse_add_response(body.as_ref())?;
        debug!(%content_hash, size = bytes.len(), "blob stored");
        Ok(content_hash)
    }

    async fn cat(&self, hash: &ContentHash) -> Result<Vec<u8>, BlobStoreError> {
        let response = self
            .client
            .post(self.endpoint("cat")?)
            .query(&[("arg", hash.as_ref())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), Some(hash)));
        }
        Ok(body.to_vec())
    }
}

fn parse_add_response(body: &[u8]) -> Result<ContentHash, BlobStoreError> {
    // `add` streams one JSON object per line; the last names the root.
    let last_line = body
        .split(|byte| *byte == b'\n')
        .rfind(|line| !line.iter().all(u8::is_ascii_whitespace))
        .ok_or_else(|| BlobStoreError::decode("empty IPFS add response"))?;
    let decoded: AddResponseDto = serde_json::from_slice(last_line).map_err(|error| {
        BlobStoreError::decode(format!("invalid IPFS add payload: {error}"))
    })?;
    debug!(name = ?decoded.name, "decoded IPFS add response");
    decoded.into_content_hash().map_err(BlobStoreError::decode)
}

fn map_transport_error(error: reqwest::Error) -> BlobStoreError {
    BlobStoreError::transport(error.to_string())
}

fn map_status_error(
    status: StatusCode,
    body: &[u8],
    requested: Option<&ContentHash>,
) -> BlobStoreError {
    let api_message = serde_json::from_slice::<ApiErrorDto>(body)
        .map(|dto| dto.message)
        .unwrap_or_default();
    let missing = status == StatusCode::NOT_FOUND || api_message.contains("not found");
    if let Some(hash) = requested.filter(|_| missing) {
        return BlobStoreError::not_found(hash.to_string());
    }

    let message = status_message(status, body);
    if status.is_client_error() {
        BlobStoreError::rejected(message)
    } else {
        BlobStoreError::transport(message)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network IPFS mapping helpers.

    use super::*;
    use rstest::rstest;

    const HASH: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    fn hash() -> ContentHash {
        ContentHash::new(HASH).expect("fixture hash")
    }

    #[test]
    fn parses_single_add_response() {
        let body = format!(r#"{{"Name":"record","Hash":"{HASH}","Size":"14"}}"#);
        let parsed = parse_add_response(body.as_bytes()).expect("decodes");
        assert_eq!(parsed, hash());
    }

    #[test]
    fn takes_the_last_streamed_object() {
        let body = format!(
            "{{\"Name\":\"a\",\"Hash\":\"QmChild\",\"Size\":\"3\"}}\n{{\"Name\":\"record\",\"Hash\":\"{HASH}\",\"Size\":\"14\"}}\n"
        );
        assert_eq!(parse_add_response(body.as_bytes()).expect("decodes"), hash());
    }

    #[rstest]
    #[case::empty(b"".as_slice())]
    #[case::not_json(b"<html>".as_slice())]
    #[case::bad_hash(br#"{"Hash":"../etc/passwd"}"#.as_slice())]
    fn rejects_malformed_add_responses(#[case] body: &[u8]) {
        let error = parse_add_response(body).expect_err("must fail");
        assert!(
            matches!(error, BlobStoreError::Decode { .. }),
            "malformed add responses should map to Decode, got {error:?}",
        );
    }

    #[rstest]
    #[case::missing(StatusCode::NOT_FOUND, b"".as_slice(), "not_found")]
    #[case::merkledag(
        StatusCode::INTERNAL_SERVER_ERROR,
        br#"{"Message":"merkledag: not found","Code":0,"Type":"error"}"#.as_slice(),
        "not_found"
    )]
    #[case::bad_request(StatusCode::BAD_REQUEST, b"bad arg".as_slice(), "rejected")]
    #[case::server_error(StatusCode::BAD_GATEWAY, b"".as_slice(), "transport")]
    fn maps_cat_statuses(#[case] status: StatusCode, #[case] body: &[u8], #[case] kind: &str) {
        assert_eq!(map_status_error(status, body, Some(&hash())).kind(), kind);
    }

    #[test]
    fn add_failures_are_never_not_found() {
        let error = map_status_error(StatusCode::NOT_FOUND, b"", None);
        assert!(matches!(error, BlobStoreError::Rejected { .. }));
    }
}
