//! Medical record references and the EHR entries created by doctors and
//! diagnostic centres.
//!
//! Record payloads live in the blob store; the ledger only keeps a timestamp
//! and the content hash. Nothing in this layer mutates or deletes a record.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccountAddress;

/// Validation errors for record primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyContentHash,
    InvalidContentHash,
}

impl fmt::Display for RecordValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContentHash => write!(f, "content hash must not be empty"),
            Self::InvalidContentHash => {
                write!(f, "content hash may only contain ASCII letters and digits")
            }
        }
    }
}

impl std::error::Error for RecordValidationError {}

/// Content identifier returned by the blob store (e.g. a CIDv0 `Qm…` hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Validate and construct a [`ContentHash`].
    pub fn new(raw: impl Into<String>) -> Result<Self, RecordValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RecordValidationError::EmptyContentHash);
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RecordValidationError::InvalidContentHash);
        }
        Ok(Self(raw))
    }

    /// Public gateway URL for this content, `<base>/ipfs/<hash>`.
    ///
    /// # Examples
    /// ```
    /// use ehr_backend::domain::ContentHash;
    ///
    /// let hash = ContentHash::new("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
    /// assert_eq!(
    ///     hash.gateway_url("https://ipfs.io/"),
    ///     "https://ipfs.io/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"
    /// );
    /// ```
    pub fn gateway_url(&self, base: &str) -> String {
        format!("{}/ipfs/{}", base.trim_end_matches('/'), self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ContentHash> for String {
    fn from(value: ContentHash) -> Self {
        value.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = RecordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of a created EHR entry, `EHR` followed by a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Build the identifier for a known UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(format!("EHR{uuid}"))
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entry of a patient's append-only record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    /// Human-readable upload time, as stored on the ledger.
    pub timestamp: String,
    pub content_hash: ContentHash,
}

/// A [`MedicalRecord`] paired with its retrieval URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub record: MedicalRecord,
    pub url: String,
}

/// Consultation entry written by a doctor (`DoctorForm.createEHR`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultation {
    pub record_id: RecordId,
    pub patient_name: String,
    pub doctor_address: AccountAddress,
    pub gender: String,
    pub diagnosis: String,
    pub prescription: String,
    /// Where the prescription PDF is mailed; not written to the ledger.
    pub email: String,
}

/// Diagnostic report written by a diagnostic centre
/// (`DiagnosticForm.createEHR`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub record_id: RecordId,
    pub doctor_name: String,
    pub patient_name: String,
    pub age: u32,
    pub gender: String,
    pub blood_group: String,
    pub diagnostic_address: AccountAddress,
    pub patient_address: AccountAddress,
    pub report_hash: ContentHash,
}
