//! Contract gateway.
//!
//! Resolves each contract's deployed address for the session's network,
//! issues the typed call or send, and normalises failures into
//! [`ErrorCode::TransactionFailed`](super::ErrorCode). Nothing is retried and
//! no reply is cached; every read goes back to the contract.
//!
//! Writes are only signed for the session's connected account. A `from`
//! address that differs is refused before any port is invoked.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ports::{
    CallContext, ConsultationLedger, ContractCallError, DiagnosticLedger, DiagnosticRegistry,
    DoctorRegistry, PatientListEntry, PatientRegistry, RecordLedger, SendContext,
};
use super::session::{ContractAddressBook, ContractKind, SessionContext};
use super::{
    AccountAddress, Consultation, ContentHash, Credential, DiagnosticDetails,
    DiagnosticRegistration, DiagnosticReport, DoctorDetails, DoctorRegistration, Error, HhNumber,
    MedicalRecord, PatientDetails, PatientRegistration,
};

/// Contract capability ports wired into a [`ContractGateway`].
#[derive(Clone)]
pub struct ContractPorts {
    pub patients: Arc<dyn PatientRegistry>,
    pub doctors: Arc<dyn DoctorRegistry>,
    pub diagnostics: Arc<dyn DiagnosticRegistry>,
    pub consultations: Arc<dyn ConsultationLedger>,
    pub diagnostic_reports: Arc<dyn DiagnosticLedger>,
    pub records: Arc<dyn RecordLedger>,
}

/// Typed entry point for every contract read and write.
#[derive(Clone)]
pub struct ContractGateway {
    ports: ContractPorts,
    addresses: ContractAddressBook,
}

impl ContractGateway {
    pub fn new(ports: ContractPorts, addresses: ContractAddressBook) -> Self {
        Self { ports, addresses }
    }

    async fn call<T, F, Fut>(
        &self,
        session: &SessionContext,
        kind: ContractKind,
        operation: &'static str,
        invoke: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(CallContext) -> Fut,
        Fut: Future<Output = Result<T, ContractCallError>>,
    {
        let contract = self.addresses.address_for(kind, session.network_id)?;
        debug!(%kind, operation, %contract, "contract call");
        invoke(CallContext { contract })
            .await
            .map_err(|err| transaction_failed(kind, operation, &err))
    }

    async fn send<F, Fut>(
        &self,
        session: &SessionContext,
        kind: ContractKind,
        operation: &'static str,
        from: &AccountAddress,
        invoke: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(SendContext) -> Fut,
        Fut: Future<Output = Result<(), ContractCallError>>,
    {
        let contract = self.addresses.address_for(kind, session.network_id)?;
        ensure_signer(session, from).inspect_err(|_| {
            warn!(
                %kind,
                operation,
                %from,
                account = %session.account,
                "sender is not the connected account"
            );
        })?;
        info!(%kind, operation, %contract, %from, "contract send");
        invoke(SendContext {
            contract,
            from: from.clone(),
        })
        .await
        .map_err(|err| transaction_failed(kind, operation, &err))
    }

    // Patient registration contract.

    pub async fn register_patient(
        &self,
        session: &SessionContext,
        registration: &PatientRegistration,
    ) -> Result<(), Error> {
        let port = &self.ports.patients;
        self.send(
            session,
            ContractKind::PatientRegistration,
            "registerPatient",
            &registration.wallet_address,
            |ctx| async move { port.register_patient(&ctx, registration).await },
        )
        .await
    }

    pub async fn is_registered_patient(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
    ) -> Result<bool, Error> {
        let port = &self.ports.patients;
        self.call(
            session,
            ContractKind::PatientRegistration,
            "isRegisteredPatient",
            |ctx| async move { port.is_registered_patient(&ctx, hh_number).await },
        )
        .await
    }

    pub async fn validate_patient_password(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, Error> {
        let port = &self.ports.patients;
        self.call(
            session,
            ContractKind::PatientRegistration,
            "validatePassword",
            |ctx| async move { port.validate_password(&ctx, hh_number, password).await },
        )
        .await
    }

    pub async fn patient_details(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
    ) -> Result<PatientDetails, Error> {
        let port = &self.ports.patients;
        self.call(
            session,
            ContractKind::PatientRegistration,
            "getPatientDetails",
            |ctx| async move { port.get_patient_details(&ctx, hh_number).await },
        )
        .await
    }

    // Doctor registration contract, including permission edges.

    pub async fn register_doctor(
        &self,
        session: &SessionContext,
        registration: &DoctorRegistration,
    ) -> Result<(), Error> {
        let port = &self.ports.doctors;
        self.send(
            session,
            ContractKind::DoctorRegistration,
            "registerDoctor",
            &registration.wallet_address,
            |ctx| async move { port.register_doctor(&ctx, registration).await },
        )
        .await
    }

    pub async fn is_registered_doctor(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
    ) -> Result<bool, Error> {
        let port = &self.ports.doctors;
        self.call(
            session,
            ContractKind::DoctorRegistration,
            "isRegisteredDoctor",
            |ctx| async move { port.is_registered_doctor(&ctx, hh_number).await },
        )
        .await
    }

    pub async fn validate_doctor_password(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, Error> {
        let port = &self.ports.doctors;
        self.call(
            session,
            ContractKind::DoctorRegistration,
            "validatePassword",
            |ctx| async move { port.validate_password(&ctx, hh_number, password).await },
        )
        .await
    }

    pub async fn doctor_details(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
    ) -> Result<DoctorDetails, Error> {
        let port = &self.ports.doctors;
        self.call(
            session,
            ContractKind::DoctorRegistration,
            "getDoctorDetails",
            |ctx| async move { port.get_doctor_details(&ctx, hh_number).await },
        )
        .await
    }

    pub async fn grant_permission(
        &self,
        session: &SessionContext,
        from: &AccountAddress,
        patient: &HhNumber,
        doctor: &HhNumber,
        patient_name: &str,
    ) -> Result<(), Error> {
        let port = &self.ports.doctors;
        self.send(
            session,
            ContractKind::DoctorRegistration,
            "grantPermission",
            from,
            |ctx| async move {
                port.grant_permission(&ctx, patient, doctor, patient_name)
                    .await
            },
        )
        .await
    }

    pub async fn revoke_permission(
        &self,
        session: &SessionContext,
        from: &AccountAddress,
        patient: &HhNumber,
        doctor: &HhNumber,
    ) -> Result<(), Error> {
        let port = &self.ports.doctors;
        self.send(
            session,
            ContractKind::DoctorRegistration,
            "revokePermission",
            from,
            |ctx| async move { port.revoke_permission(&ctx, patient, doctor).await },
        )
        .await
    }

    pub async fn is_permission_granted(
        &self,
        session: &SessionContext,
        patient: &HhNumber,
        doctor: &HhNumber,
    ) -> Result<bool, Error> {
        let port = &self.ports.doctors;
        self.call(
            session,
            ContractKind::DoctorRegistration,
            "isPermissionGranted",
            |ctx| async move { port.is_permission_granted(&ctx, patient, doctor).await },
        )
        .await
    }

    pub async fn patient_list(
        &self,
        session: &SessionContext,
        doctor: &HhNumber,
    ) -> Result<Vec<PatientListEntry>, Error> {
        let port = &self.ports.doctors;
        self.call(
            session,
            ContractKind::DoctorRegistration,
            "getPatientList",
            |ctx| async move { port.get_patient_list(&ctx, doctor).await },
        )
        .await
    }

    // Diagnostic centre registration contract.

    pub async fn register_diagnostic(
        &self,
        session: &SessionContext,
        registration: &DiagnosticRegistration,
    ) -> Result<(), Error> {
        let port = &self.ports.diagnostics;
        self.send(
            session,
            ContractKind::DiagnosticRegistration,
            "registerDiagnostic",
            &registration.wallet_address,
            |ctx| async move { port.register_diagnostic(&ctx, registration).await },
        )
        .await
    }

    pub async fn is_registered_diagnostic(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
    ) -> Result<bool, Error> {
        let port = &self.ports.diagnostics;
        self.call(
            session,
            ContractKind::DiagnosticRegistration,
            "isRegisteredDiagnostic",
            |ctx| async move { port.is_registered_diagnostic(&ctx, hh_number).await },
        )
        .await
    }

    pub async fn validate_diagnostic_password(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, Error> {
        let port = &self.ports.diagnostics;
        self.call(
            session,
            ContractKind::DiagnosticRegistration,
            "validatePassword",
            |ctx| async move { port.validate_password(&ctx, hh_number, password).await },
        )
        .await
    }

    pub async fn diagnostic_details(
        &self,
        session: &SessionContext,
        hh_number: &HhNumber,
    ) -> Result<DiagnosticDetails, Error> {
        let port = &self.ports.diagnostics;
        self.call(
            session,
            ContractKind::DiagnosticRegistration,
            "getDiagnosticDetails",
            |ctx| async move { port.get_diagnostic_details(&ctx, hh_number).await },
        )
        .await
    }

    // Record contracts.

    pub async fn create_consultation(
        &self,
        session: &SessionContext,
        consultation: &Consultation,
    ) -> Result<(), Error> {
        let port = &self.ports.consultations;
        self.send(
            session,
            ContractKind::DoctorForm,
            "createEHR",
            &consultation.doctor_address,
            |ctx| async move { port.create_ehr(&ctx, consultation).await },
        )
        .await
    }

    pub async fn create_diagnostic_report(
        &self,
        session: &SessionContext,
        report: &DiagnosticReport,
    ) -> Result<(), Error> {
        let port = &self.ports.diagnostic_reports;
        self.send(
            session,
            ContractKind::DiagnosticForm,
            "createEHR",
            &report.diagnostic_address,
            |ctx| async move { port.create_ehr(&ctx, report).await },
        )
        .await
    }

    pub async fn add_record(
        &self,
        session: &SessionContext,
        owner: &AccountAddress,
        timestamp: &str,
        content_hash: &ContentHash,
    ) -> Result<(), Error> {
        let port = &self.ports.records;
        self.send(
            session,
            ContractKind::UploadEhr,
            "addRecord",
            owner,
            |ctx| async move { port.add_record(&ctx, timestamp, content_hash).await },
        )
        .await
    }

    pub async fn records(
        &self,
        session: &SessionContext,
        owner: &AccountAddress,
    ) -> Result<Vec<MedicalRecord>, Error> {
        let port = &self.ports.records;
        self.call(
            session,
            ContractKind::UploadEhr,
            "getRecords",
            |ctx| async move { port.get_records(&ctx, owner).await },
        )
        .await
    }
}

/// Fails unless `from` is the session's connected account.
pub(crate) fn ensure_signer(session: &SessionContext, from: &AccountAddress) -> Result<(), Error> {
    if *from == session.account {
        Ok(())
    } else {
        Err(Error::transaction_failed(format!(
            "Sender {from} is not the connected account"
        )))
    }
}

fn transaction_failed(kind: ContractKind, operation: &'static str, err: &ContractCallError) -> Error {
    warn!(%kind, operation, failure = err.kind(), error = %err, "contract invocation failed");
    Error::transaction_failed(err.provider_message())
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
