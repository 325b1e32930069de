//! Patient/doctor permission workflow.
//!
//! Each `(patient, doctor)` pair is either granted or not. Grant and revoke
//! are guarded by an existence check on the doctor and a state check on the
//! edge; a guard that fails issues no send. The checks and the send are not
//! atomic: the contract's own revert is the final arbiter when two portals
//! race, and the in-flight lock only stops a double submit from this one.

use serde::Serialize;
use tracing::info;

use super::in_flight::{InFlightRegistry, Operation, OperationKey};
use super::ports::PatientListEntry;
use super::validation::parse_doctor_number;
use super::{ContractGateway, Error, HhNumber, Role, Route, SessionContext};

/// Result of a grant or revoke attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PermissionOutcome {
    Granted { route: Route },
    AlreadyGranted,
    Revoked { route: Route },
    NotGranted,
    DoctorNotFound,
}

impl PermissionOutcome {
    /// User-facing confirmation.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Granted { .. } => "Access granted successfully.",
            Self::AlreadyGranted => "Access is already given!",
            Self::Revoked { .. } => "Access removed successfully.",
            Self::NotGranted => "Access was not granted to this doctor.",
            Self::DoctorNotFound => "Doctor does not exist!",
        }
    }

    /// Page to navigate to, if any.
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Granted { route } | Self::Revoked { route } => Some(route),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Grant,
    Revoke,
}

/// Grants and revokes doctor access to a patient's records.
#[derive(Clone)]
pub struct PermissionService {
    gateway: ContractGateway,
    in_flight: InFlightRegistry,
}

impl PermissionService {
    pub fn new(gateway: ContractGateway, in_flight: InFlightRegistry) -> Self {
        Self { gateway, in_flight }
    }

    /// Give `doctor_number` access to `patient`'s records.
    ///
    /// The send is signed by the patient's registered wallet, not the
    /// doctor's, so the session must be connected to that wallet.
    pub async fn grant(
        &self,
        session: &SessionContext,
        patient: &HhNumber,
        doctor_number: &str,
    ) -> Result<PermissionOutcome, Error> {
        self.transition(session, patient, doctor_number, Direction::Grant)
            .await
    }

    /// Withdraw `doctor_number`'s access to `patient`'s records.
    ///
    /// Signed by the patient's registered wallet, like [`Self::grant`].
    pub async fn revoke(
        &self,
        session: &SessionContext,
        patient: &HhNumber,
        doctor_number: &str,
    ) -> Result<PermissionOutcome, Error> {
        self.transition(session, patient, doctor_number, Direction::Revoke)
            .await
    }

    async fn transition(
        &self,
        session: &SessionContext,
        patient: &HhNumber,
        doctor_number: &str,
        direction: Direction,
    ) -> Result<PermissionOutcome, Error> {
        let doctor = parse_doctor_number(doctor_number).map_err(|errors| errors.into_error())?;
        let operation = match direction {
            Direction::Grant => Operation::GrantPermission,
            Direction::Revoke => Operation::RevokePermission,
        };
        let _guard = self
            .in_flight
            .try_acquire(OperationKey::new(Role::Patient, patient.clone(), operation))?;

        if !self.gateway.is_registered_doctor(session, &doctor).await? {
            return Ok(PermissionOutcome::DoctorNotFound);
        }
        let granted = self
            .gateway
            .is_permission_granted(session, patient, &doctor)
            .await?;
        match (direction, granted) {
            (Direction::Grant, true) => return Ok(PermissionOutcome::AlreadyGranted),
            (Direction::Revoke, false) => return Ok(PermissionOutcome::NotGranted),
            _ => {}
        }

        let details = self.gateway.patient_details(session, patient).await?;
        let route = Route::PatientDashboard(patient.clone());
        match direction {
            Direction::Grant => {
                self.gateway
                    .grant_permission(
                        session,
                        &details.wallet_address,
                        patient,
                        &doctor,
                        &details.name,
                    )
                    .await?;
                info!(%patient, %doctor, "permission granted");
                Ok(PermissionOutcome::Granted { route })
            }
            Direction::Revoke => {
                self.gateway
                    .revoke_permission(session, &details.wallet_address, patient, &doctor)
                    .await?;
                info!(%patient, %doctor, "permission revoked");
                Ok(PermissionOutcome::Revoked { route })
            }
        }
    }

    /// Patients who have granted `doctor` access.
    pub async fn patient_list(
        &self,
        session: &SessionContext,
        doctor: &HhNumber,
    ) -> Result<Vec<PatientListEntry>, Error> {
        self.gateway.patient_list(session, doctor).await
    }

    /// Doctor-side removal of a patient from their list, signed by the
    /// doctor's wallet. Returns the refreshed list.
    pub async fn remove_patient(
        &self,
        session: &SessionContext,
        doctor: &HhNumber,
        patient: &HhNumber,
    ) -> Result<Vec<PatientListEntry>, Error> {
        let _guard = self
            .in_flight
            .try_acquire(OperationKey::new(
                Role::Doctor,
                doctor.clone(),
                Operation::RemovePatient,
            ))?;
        let details = self.gateway.doctor_details(session, doctor).await?;
        self.gateway
            .revoke_permission(session, &details.wallet_address, patient, doctor)
            .await?;
        info!(%patient, %doctor, "patient removed from doctor list");
        self.gateway.patient_list(session, doctor).await
    }
}

#[cfg(test)]
#[path = "permission_tests.rs"]
mod tests;
