//! Medical record workflows: uploads, listings, and EHR entry creation.
//!
//! Payloads go to the blob store first; only the returned hash reaches the
//! ledger. Record lists are append-only and re-read on every request.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tracing::{info, warn};

use super::gateway::ensure_signer;
use super::in_flight::{InFlightRegistry, Operation, OperationKey};
use super::ports::{
    BlobStore, BlobStoreError, PrescriptionRelay, PrescriptionRelayError, PrescriptionRequest,
};
use super::validation::{
    FieldErrors, FormValues, parse_consultation, parse_diagnostic_report,
    validate_diagnostic_report,
};
use super::{
    AccountAddress, ContentHash, ContractGateway, Error, HhNumber, RecordId, RecordView, Role,
    Route, SessionContext,
};

/// Timestamp layout stored alongside uploaded records.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Result of a record-writing workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<ContentHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

/// Collaborators of [`RecordService`] beyond the contract gateway.
#[derive(Clone)]
pub struct RecordServiceDeps {
    pub blobs: Arc<dyn BlobStore>,
    pub relay: Arc<dyn PrescriptionRelay>,
    pub clock: Arc<dyn Clock>,
    /// Public gateway base used to build record URLs.
    pub gateway_base: String,
}

/// Drives record uploads, record listings, and EHR creation.
#[derive(Clone)]
pub struct RecordService {
    gateway: ContractGateway,
    deps: RecordServiceDeps,
    in_flight: InFlightRegistry,
}

impl RecordService {
    pub fn new(
        gateway: ContractGateway,
        deps: RecordServiceDeps,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            gateway,
            deps,
            in_flight,
        }
    }

    /// Store `file` and append it to `patient`'s record list, signed by the
    /// patient's own wallet.
    pub async fn upload_patient_record(
        &self,
        session: &SessionContext,
        patient: &HhNumber,
        file: &[u8],
    ) -> Result<RecordOutcome, Error> {
        if file.is_empty() {
            return Err(missing_file("Please select a file!"));
        }
        let _guard = self
            .in_flight
            .try_acquire(OperationKey::new(
                Role::Patient,
                patient.clone(),
                Operation::UploadRecord,
            ))?;
        let details = self.gateway.patient_details(session, patient).await?;
        let content_hash = self
            .store_and_append(session, &details.wallet_address, file)
            .await?;
        info!(%patient, %content_hash, "patient record uploaded");
        Ok(RecordOutcome {
            message: "EHR uploaded successfully.".to_owned(),
            record_id: None,
            content_hash: Some(content_hash),
            route: Some(Route::PatientDashboard(patient.clone())),
        })
    }

    /// Diagnostic centre upload into a patient's record list. The send is
    /// signed by the patient address entered on the form, so the connected
    /// wallet must hold that account; otherwise nothing is stored.
    pub async fn upload_for_patient(
        &self,
        session: &SessionContext,
        diagnostic: &HhNumber,
        patient_address: &str,
        file: &[u8],
    ) -> Result<RecordOutcome, Error> {
        if file.is_empty() {
            return Err(missing_file("No file uploaded"));
        }
        let owner = form_address("patientAddress", patient_address)?;
        ensure_signer(session, &owner)?;
        let _guard = self
            .in_flight
            .try_acquire(OperationKey::new(
                Role::Diagnostic,
                diagnostic.clone(),
                Operation::UploadRecord,
            ))?;
        let content_hash = self.store_and_append(session, &owner, file).await?;
        info!(%diagnostic, %owner, %content_hash, "record uploaded for patient");
        Ok(RecordOutcome {
            message: "EHR uploaded successfully.".to_owned(),
            record_id: None,
            content_hash: Some(content_hash),
            route: Some(Route::DiagnosticDashboard(diagnostic.clone())),
        })
    }

    async fn store_and_append(
        &self,
        session: &SessionContext,
        owner: &AccountAddress,
        file: &[u8],
    ) -> Result<ContentHash, Error> {
        let content_hash = self.deps.blobs.add(file).await.map_err(map_blob_error)?;
        let timestamp = self.deps.clock.utc().format(RECORD_TIMESTAMP_FORMAT).to_string();
        self.gateway
            .add_record(session, owner, &timestamp, &content_hash)
            .await?;
        Ok(content_hash)
    }

    /// `patient`'s records, oldest first, each with its gateway URL.
    pub async fn patient_records(
        &self,
        session: &SessionContext,
        patient: &HhNumber,
    ) -> Result<Vec<RecordView>, Error> {
        let details = self.gateway.patient_details(session, patient).await?;
        let records = self
            .gateway
            .records(session, &details.wallet_address)
            .await?;
        Ok(records
            .into_iter()
            .map(|record| RecordView {
                url: record.content_hash.gateway_url(&self.deps.gateway_base),
                record,
            })
            .collect())
    }

    /// Raw bytes of a stored record.
    pub async fn record_content(&self, content_hash: &ContentHash) -> Result<Vec<u8>, Error> {
        self.deps
            .blobs
            .cat(content_hash)
            .await
            .map_err(map_blob_error)
    }

    /// Store a diagnostic report file and write the EHR entry from the
    /// diagnostic centre's wallet.
    pub async fn create_diagnostic_report(
        &self,
        session: &SessionContext,
        diagnostic: &HhNumber,
        form: &FormValues,
        file: &[u8],
    ) -> Result<RecordOutcome, Error> {
        let errors = validate_diagnostic_report(form, file);
        if !errors.is_empty() {
            return Err(errors.into_error());
        }
        let signer = form_address("diagnosticAddress", form.get("diagnosticAddress"))?;
        ensure_signer(session, &signer)?;
        let _guard = self.in_flight.try_acquire(OperationKey::new(
            Role::Diagnostic,
            diagnostic.clone(),
            Operation::CreateDiagnosticReport,
        ))?;

        let report_hash = self.deps.blobs.add(file).await.map_err(map_blob_error)?;
        let report = parse_diagnostic_report(form, RecordId::generate(), report_hash)
            .map_err(FieldErrors::into_error)?;
        self.gateway
            .create_diagnostic_report(session, &report)
            .await?;
        info!(%diagnostic, record_id = %report.record_id, "diagnostic report created");
        Ok(RecordOutcome {
            message: "EHR created successfully.".to_owned(),
            record_id: Some(report.record_id),
            content_hash: Some(report.report_hash),
            route: None,
        })
    }

    /// Write a consultation EHR from the doctor's wallet, then hand the
    /// prescription to the mail relay.
    ///
    /// The ledger write cannot be rolled back; a relay failure after it is
    /// reported as [`ErrorCode::RelayRequestFailed`](super::ErrorCode).
    pub async fn submit_consultation(
        &self,
        session: &SessionContext,
        doctor: &HhNumber,
        form: &FormValues,
    ) -> Result<RecordOutcome, Error> {
        let consultation =
            parse_consultation(form, RecordId::generate()).map_err(FieldErrors::into_error)?;
        let _guard = self
            .in_flight
            .try_acquire(OperationKey::new(
                Role::Doctor,
                doctor.clone(),
                Operation::CreateConsultation,
            ))?;

        self.gateway
            .create_consultation(session, &consultation)
            .await?;
        info!(%doctor, record_id = %consultation.record_id, "consultation recorded");

        let request = PrescriptionRequest {
            patient_name: consultation.patient_name.clone(),
            diagnosis: consultation.diagnosis.clone(),
            medicines: consultation.prescription.clone(),
            email: consultation.email.clone(),
        };
        let message = self
            .deps
            .relay
            .send(&request)
            .await
            .map_err(map_relay_error)?;
        Ok(RecordOutcome {
            message,
            record_id: Some(consultation.record_id),
            content_hash: None,
            route: None,
        })
    }
}

fn form_address(field: &str, raw: &str) -> Result<AccountAddress, Error> {
    AccountAddress::new(raw).map_err(|err| {
        let mut errors = FieldErrors::new();
        errors.insert(field, err.to_string());
        errors.into_error()
    })
}

fn missing_file(message: &str) -> Error {
    Error::validation_failed(message).with_details(serde_json::json!({
        "fieldErrors": { "file": message }
    }))
}

fn map_blob_error(err: BlobStoreError) -> Error {
    warn!(failure = err.kind(), error = %err, "blob store request failed");
    match err {
        BlobStoreError::NotFound { hash } => {
            Error::not_found(format!("no record stored under {hash}"))
        }
        other => Error::storage_failed(other.to_string()),
    }
}

fn map_relay_error(err: PrescriptionRelayError) -> Error {
    warn!(failure = err.kind(), error = %err, "prescription relay request failed");
    match err {
        PrescriptionRelayError::Rejected { message, .. } => Error::relay_request_failed(message),
        other => Error::relay_request_failed(other.to_string()),
    }
}

#[cfg(test)]
#[path = "record_service_tests.rs"]
mod tests;
