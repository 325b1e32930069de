//! Process-local ledger implementing every contract port.
//!
//! Mirrors the observable behaviour of the deployed contracts closely enough
//! for local runs and integration tests: duplicate registrations and missing
//! identities revert, record lists only grow, and every send is journalled.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CallContext, ConsultationLedger, ContractCallError, DiagnosticLedger, DiagnosticRegistry,
    DoctorRegistry, PatientListEntry, PatientRegistry, RecordLedger, SendContext,
};
use crate::domain::{
    AccountAddress, Consultation, ContentHash, Credential, DiagnosticDetails,
    DiagnosticRegistration, DiagnosticReport, DoctorDetails, DoctorRegistration, HhNumber,
    MedicalRecord, PatientDetails, PatientRegistration,
};

/// A state-changing call accepted by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransaction {
    pub contract: AccountAddress,
    pub from: AccountAddress,
    pub method: &'static str,
}

#[derive(Default)]
struct LedgerState {
    patients: HashMap<HhNumber, PatientRegistration>,
    doctors: HashMap<HhNumber, DoctorRegistration>,
    diagnostics: HashMap<HhNumber, DiagnosticRegistration>,
    /// Doctor number to granted patients, in grant order.
    permissions: HashMap<HhNumber, Vec<PatientListEntry>>,
    records: HashMap<AccountAddress, Vec<MedicalRecord>>,
    consultations: BTreeMap<String, Consultation>,
    diagnostic_reports: BTreeMap<String, DiagnosticReport>,
    journal: Vec<SentTransaction>,
}

impl LedgerState {
    fn journal(&mut self, ctx: &SendContext, method: &'static str) {
        debug!(method, from = %ctx.from, "ledger transaction accepted");
        self.journal.push(SentTransaction {
            contract: ctx.contract.clone(),
            from: ctx.from.clone(),
            method,
        });
    }
}

/// Shared in-memory ledger; clones observe the same state.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every accepted send, oldest first.
    pub fn sent_transactions(&self) -> Vec<SentTransaction> {
        self.state().journal.clone()
    }

    /// Consultation written under `record_id`, if any.
    pub fn consultation(&self, record_id: &str) -> Option<Consultation> {
        self.state().consultations.get(record_id).cloned()
    }

    /// Diagnostic report written under `record_id`, if any.
    pub fn diagnostic_report(&self, record_id: &str) -> Option<DiagnosticReport> {
        self.state().diagnostic_reports.get(record_id).cloned()
    }
}

fn revert(message: impl Into<String>) -> ContractCallError {
    ContractCallError::reverted(message)
}

fn password_matches(stored: &Credential, offered: &Credential) -> bool {
    stored.expose() == offered.expose()
}

#[async_trait]
impl PatientRegistry for InMemoryLedger {
    async fn register_patient(
        &self,
        ctx: &SendContext,
        registration: &PatientRegistration,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        if state.patients.contains_key(&registration.hh_number) {
            return Err(revert("Patient already registered"));
        }
        state
            .patients
            .insert(registration.hh_number.clone(), registration.clone());
        state.journal(ctx, "registerPatient");
        Ok(())
    }

    async fn is_registered_patient(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<bool, ContractCallError> {
        Ok(self.state().patients.contains_key(hh_number))
    }

    async fn validate_password(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, ContractCallError> {
        Ok(self
            .state()
            .patients
            .get(hh_number)
            .is_some_and(|patient| password_matches(&patient.password, password)))
    }

    async fn get_patient_details(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<PatientDetails, ContractCallError> {
        self.state()
            .patients
            .get(hh_number)
            .map(PatientDetails::from)
            .ok_or_else(|| revert("Patient not registered"))
    }
}

#[async_trait]
impl DoctorRegistry for InMemoryLedger {
    async fn register_doctor(
        &self,
        ctx: &SendContext,
        registration: &DoctorRegistration,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        if state.doctors.contains_key(&registration.hh_number) {
            return Err(revert("Doctor already registered"));
        }
        state
            .doctors
            .insert(registration.hh_number.clone(), registration.clone());
        state.journal(ctx, "registerDoctor");
        Ok(())
    }

    async fn is_registered_doctor(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<bool, ContractCallError> {
        Ok(self.state().doctors.contains_key(hh_number))
    }

    async fn validate_password(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, ContractCallError> {
        Ok(self
            .state()
            .doctors
            .get(hh_number)
            .is_some_and(|doctor| password_matches(&doctor.password, password)))
    }

    async fn get_doctor_details(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<DoctorDetails, ContractCallError> {
        self.state()
            .doctors
            .get(hh_number)
            .map(DoctorDetails::from)
            .ok_or_else(|| revert("Doctor not registered"))
    }

    async fn grant_permission(
        &self,
        ctx: &SendContext,
        patient: &HhNumber,
        doctor: &HhNumber,
        patient_name: &str,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        if !state.doctors.contains_key(doctor) {
            return Err(revert("Doctor not registered"));
        }
        let granted = state.permissions.entry(doctor.clone()).or_default();
        if granted.iter().any(|entry| entry.patient_number == *patient) {
            return Err(revert("Permission already granted"));
        }
        granted.push(PatientListEntry {
            patient_number: patient.clone(),
            patient_name: patient_name.to_owned(),
        });
        state.journal(ctx, "grantPermission");
        Ok(())
    }

    async fn revoke_permission(
        &self,
        ctx: &SendContext,
        patient: &HhNumber,
        doctor: &HhNumber,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        let Some(granted) = state.permissions.get_mut(doctor) else {
            return Err(revert("Permission not granted"));
        };
        let before = granted.len();
        granted.retain(|entry| entry.patient_number != *patient);
        if granted.len() == before {
            return Err(revert("Permission not granted"));
        }
        state.journal(ctx, "revokePermission");
        Ok(())
    }

    async fn is_permission_granted(
        &self,
        _ctx: &CallContext,
        patient: &HhNumber,
        doctor: &HhNumber,
    ) -> Result<bool, ContractCallError> {
        Ok(self
            .state()
            .permissions
            .get(doctor)
            .is_some_and(|granted| granted.iter().any(|entry| entry.patient_number == *patient)))
    }

    async fn get_patient_list(
        &self,
        _ctx: &CallContext,
        doctor: &HhNumber,
    ) -> Result<Vec<PatientListEntry>, ContractCallError> {
        Ok(self
            .state()
            .permissions
            .get(doctor)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl DiagnosticRegistry for InMemoryLedger {
    async fn register_diagnostic(
        &self,
        ctx: &SendContext,
        registration: &DiagnosticRegistration,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        if state.diagnostics.contains_key(&registration.hh_number) {
            return Err(revert("Diagnostic already registered"));
        }
        state
            .diagnostics
            .insert(registration.hh_number.clone(), registration.clone());
        state.journal(ctx, "registerDiagnostic");
        Ok(())
    }

    async fn is_registered_diagnostic(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<bool, ContractCallError> {
        Ok(self.state().diagnostics.contains_key(hh_number))
    }

    async fn validate_password(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, ContractCallError> {
        Ok(self
            .state()
            .diagnostics
            .get(hh_number)
            .is_some_and(|centre| password_matches(&centre.password, password)))
    }

    async fn get_diagnostic_details(
        &self,
        _ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<DiagnosticDetails, ContractCallError> {
        self.state()
            .diagnostics
            .get(hh_number)
            .map(DiagnosticDetails::from)
            .ok_or_else(|| revert("Diagnostic not registered"))
    }
}

#[async_trait]
impl ConsultationLedger for InMemoryLedger {
    async fn create_ehr(
        &self,
        ctx: &SendContext,
        consultation: &Consultation,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        let key = consultation.record_id.to_string();
        if state.consultations.contains_key(&key) {
            return Err(revert("Record already exists"));
        }
        state.consultations.insert(key, consultation.clone());
        state.journal(ctx, "createEHR");
        Ok(())
    }
}

#[async_trait]
impl DiagnosticLedger for InMemoryLedger {
    async fn create_ehr(
        &self,
        ctx: &SendContext,
        report: &DiagnosticReport,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        let key = report.record_id.to_string();
        if state.diagnostic_reports.contains_key(&key) {
            return Err(revert("Record already exists"));
        }
        state.diagnostic_reports.insert(key, report.clone());
        state.journal(ctx, "createEHR");
        Ok(())
    }
}

#[async_trait]
impl RecordLedger for InMemoryLedger {
    async fn add_record(
        &self,
        ctx: &SendContext,
        timestamp: &str,
        content_hash: &ContentHash,
    ) -> Result<(), ContractCallError> {
        let mut state = self.state();
        state
            .records
            .entry(ctx.from.clone())
            .or_default()
            .push(MedicalRecord {
                timestamp: timestamp.to_owned(),
                content_hash: content_hash.clone(),
            });
        state.journal(ctx, "addRecord");
        Ok(())
    }

    async fn get_records(
        &self,
        _ctx: &CallContext,
        owner: &AccountAddress,
    ) -> Result<Vec<MedicalRecord>, ContractCallError> {
        Ok(self.state().records.get(owner).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "in_memory_tests.rs"]
mod tests;
