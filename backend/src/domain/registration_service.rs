//! Registration workflow for patients, doctors, and diagnostic centres.
//!
//! Order is fixed: validate the form (no contract call on failure), ask the
//! registry whether the HH number is taken, then send the registration from
//! the wallet address entered on the form.

use serde::Serialize;
use tracing::info;

use super::in_flight::{InFlightRegistry, Operation, OperationKey};
use super::validation::{
    FormValues, parse_diagnostic_registration, parse_doctor_registration,
    parse_patient_registration,
};
use super::{ContractGateway, Error, Role, Route, SessionContext};

/// Result of a registration attempt that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Registered { role: Role, route: Route },
    AlreadyRegistered { role: Role },
}

impl RegistrationOutcome {
    /// User-facing confirmation, e.g. "Patient registered successfully!".
    pub fn message(&self) -> String {
        match self {
            Self::Registered { role, .. } => format!("{role} registered successfully!"),
            Self::AlreadyRegistered { role } => format!("{role} already exists"),
        }
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Registered { route, .. } => Some(route),
            Self::AlreadyRegistered { .. } => None,
        }
    }
}

/// Drives the three registration forms.
#[derive(Clone)]
pub struct RegistrationService {
    gateway: ContractGateway,
    in_flight: InFlightRegistry,
}

impl RegistrationService {
    pub fn new(gateway: ContractGateway, in_flight: InFlightRegistry) -> Self {
        Self { gateway, in_flight }
    }

    pub async fn register_patient(
        &self,
        session: &SessionContext,
        form: &FormValues,
    ) -> Result<RegistrationOutcome, Error> {
        let registration = parse_patient_registration(form).map_err(|e| e.into_error())?;
        let _guard = self.in_flight.try_acquire(OperationKey::new(
            Role::Patient,
            registration.hh_number.clone(),
            Operation::Register,
        ))?;

        if self
            .gateway
            .is_registered_patient(session, &registration.hh_number)
            .await?
        {
            return Ok(RegistrationOutcome::AlreadyRegistered {
                role: Role::Patient,
            });
        }
        self.gateway.register_patient(session, &registration).await?;
        info!(hh_number = %registration.hh_number, "patient registered");
        Ok(registered(Role::Patient))
    }

    pub async fn register_doctor(
        &self,
        session: &SessionContext,
        form: &FormValues,
    ) -> Result<RegistrationOutcome, Error> {
        let registration = parse_doctor_registration(form).map_err(|e| e.into_error())?;
        let _guard = self.in_flight.try_acquire(OperationKey::new(
            Role::Doctor,
            registration.hh_number.clone(),
            Operation::Register,
        ))?;

        if self
            .gateway
            .is_registered_doctor(session, &registration.hh_number)
            .await?
        {
            return Ok(RegistrationOutcome::AlreadyRegistered { role: Role::Doctor });
        }
        self.gateway.register_doctor(session, &registration).await?;
        info!(hh_number = %registration.hh_number, "doctor registered");
        Ok(registered(Role::Doctor))
    }

    pub async fn register_diagnostic(
        &self,
        session: &SessionContext,
        form: &FormValues,
    ) -> Result<RegistrationOutcome, Error> {
        let registration = parse_diagnostic_registration(form).map_err(|e| e.into_error())?;
        let _guard = self.in_flight.try_acquire(OperationKey::new(
            Role::Diagnostic,
            registration.hh_number.clone(),
            Operation::Register,
        ))?;

        if self
            .gateway
            .is_registered_diagnostic(session, &registration.hh_number)
            .await?
        {
            return Ok(RegistrationOutcome::AlreadyRegistered {
                role: Role::Diagnostic,
            });
        }
        self.gateway
            .register_diagnostic(session, &registration)
            .await?;
        info!(hh_number = %registration.hh_number, "diagnostic centre registered");
        Ok(registered(Role::Diagnostic))
    }
}

fn registered(role: Role) -> RegistrationOutcome {
    RegistrationOutcome::Registered {
        role,
        route: Route::Home,
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
