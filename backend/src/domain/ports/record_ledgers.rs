//! Capability ports for the three record-writing contracts.

use async_trait::async_trait;

use crate::domain::{AccountAddress, Consultation, ContentHash, DiagnosticReport, MedicalRecord};

use super::{CallContext, ContractCallError, SendContext};

/// Doctor form contract (`createEHR` for consultations).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsultationLedger: Send + Sync {
    async fn create_ehr(
        &self,
        ctx: &SendContext,
        consultation: &Consultation,
    ) -> Result<(), ContractCallError>;
}

/// Diagnostic form contract (`createEHR` for reports).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagnosticLedger: Send + Sync {
    async fn create_ehr(
        &self,
        ctx: &SendContext,
        report: &DiagnosticReport,
    ) -> Result<(), ContractCallError>;
}

/// Upload contract holding each patient's append-only record list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordLedger: Send + Sync {
    /// `addRecord(timestamp, hash)`, appended to the list of `ctx.from`.
    async fn add_record(
        &self,
        ctx: &SendContext,
        timestamp: &str,
        content_hash: &ContentHash,
    ) -> Result<(), ContractCallError>;

    /// `getRecords(owner)`, oldest first.
    async fn get_records(
        &self,
        ctx: &CallContext,
        owner: &AccountAddress,
    ) -> Result<Vec<MedicalRecord>, ContractCallError>;
}
