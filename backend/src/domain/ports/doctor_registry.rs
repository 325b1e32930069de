//! Typed capability port for the doctor registration contract.
//!
//! The doctor contract also owns the patient/doctor permission edges.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Credential, DoctorDetails, DoctorRegistration, HhNumber};

use super::{CallContext, ContractCallError, SendContext};

/// One row of `getPatientList(doctorNumber)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListEntry {
    pub patient_number: HhNumber,
    pub patient_name: String,
}

/// Doctor registration contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRegistry: Send + Sync {
    /// `registerDoctor(...)`.
    async fn register_doctor(
        &self,
        ctx: &SendContext,
        registration: &DoctorRegistration,
    ) -> Result<(), ContractCallError>;

    /// `isRegisteredDoctor(hhNumber)`.
    async fn is_registered_doctor(
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

    /// `getDoctorDetails(hhNumber)`.
    async fn get_doctor_details(
        &self,
        ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<DoctorDetails, ContractCallError>;

    /// `grantPermission(patientNumber, doctorNumber, patientName)`.
    async fn grant_permission(
        &self,
        ctx: &SendContext,
        patient: &HhNumber,
        doctor: &HhNumber,
        patient_name: &str,
    ) -> Result<(), ContractCallError>;

    /// `revokePermission(patientNumber, doctorNumber)`.
    async fn revoke_permission(
        &self,
        ctx: &SendContext,
        patient: &HhNumber,
        doctor: &HhNumber,
    ) -> Result<(), ContractCallError>;

    /// `isPermissionGranted(patientNumber, doctorNumber)`.
    async fn is_permission_granted(
        &self,
        ctx: &CallContext,
        patient: &HhNumber,
        doctor: &HhNumber,
    ) -> Result<bool, ContractCallError>;

    /// `getPatientList(doctorNumber)`.
    async fn get_patient_list(
        &self,
        ctx: &CallContext,
        doctor: &HhNumber,
    ) -> Result<Vec<PatientListEntry>, ContractCallError>;
}
