//! Typed capability port for the patient registration contract.

use async_trait::async_trait;

use crate::domain::{Credential, HhNumber, PatientDetails, PatientRegistration};

use super::{CallContext, ContractCallError, SendContext};

/// Patient registration contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRegistry: Send + Sync {
    /// `registerPatient(...)`.
    async fn register_patient(
        &self,
        ctx: &SendContext,
        registration: &PatientRegistration,
    ) -> Result<(), ContractCallError>;

    /// `isRegisteredPatient(hhNumber)`.
    async fn is_registered_patient(
        &self,
        ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<bool, ContractCallError>;

    /// `validatePassword(hhNumber, password)`.
    async fn validate_password(
        &self,
        ctx: &CallContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, ContractCallError>;

    /// `getPatientDetails(hhNumber)`.
    async fn get_patient_details(
        &self,
        ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<PatientDetails, ContractCallError>;
}
