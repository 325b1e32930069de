//! Login workflow shared by the three roles.
//!
//! The password is checked by the registration contract; this layer only
//! forwards it and reacts to the verdict.

use serde::Serialize;
use tracing::{debug, info};

use super::validation::{FormValues, parse_login};
use super::{
    ActorDetails, ContractGateway, Error, HhNumber, LoginCredentials, Role, Route, SessionContext,
};

/// Result of a login attempt that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    Authenticated { route: Route, details: ActorDetails },
    NotRegistered { role: Role },
    IncorrectPassword,
}

impl LoginOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Authenticated { .. } => "Login successful",
            Self::NotRegistered { role: Role::Patient } => "Patient not registered",
            Self::NotRegistered { role: Role::Doctor } => "Doctor not registered",
            Self::NotRegistered {
                role: Role::Diagnostic,
            } => "Diagnostic center not registered",
            Self::IncorrectPassword => "Incorrect password",
        }
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Authenticated { route, .. } => Some(route),
            _ => None,
        }
    }
}

/// Authenticates an HH number and password against a role's registry.
#[derive(Clone)]
pub struct LoginService {
    gateway: ContractGateway,
}

impl LoginService {
    pub fn new(gateway: ContractGateway) -> Self {
        Self { gateway }
    }

    pub async fn login(
        &self,
        session: &SessionContext,
        role: Role,
        form: &FormValues,
    ) -> Result<LoginOutcome, Error> {
        let credentials = parse_login(form).map_err(|e| e.into_error())?;
        let LoginCredentials {
            hh_number,
            password,
        } = &credentials;

        if !self.is_registered(session, role, hh_number).await? {
            debug!(%role, %hh_number, "login for unregistered identity");
            return Ok(LoginOutcome::NotRegistered { role });
        }
        let valid = match role {
            Role::Patient => {
                self.gateway
                    .validate_patient_password(session, hh_number, password)
                    .await?
            }
            Role::Doctor => {
                self.gateway
                    .validate_doctor_password(session, hh_number, password)
                    .await?
            }
            Role::Diagnostic => {
                self.gateway
                    .validate_diagnostic_password(session, hh_number, password)
                    .await?
            }
        };
        if !valid {
            return Ok(LoginOutcome::IncorrectPassword);
        }

        let details = self.details(session, role, hh_number).await?;
        info!(%role, %hh_number, "login succeeded");
        Ok(LoginOutcome::Authenticated {
            route: Route::dashboard(role, hh_number.clone()),
            details,
        })
    }

    async fn is_registered(
        &self,
        session: &SessionContext,
        role: Role,
        hh_number: &HhNumber,
    ) -> Result<bool, Error> {
        match role {
            Role::Patient => self.gateway.is_registered_patient(session, hh_number).await,
            Role::Doctor => self.gateway.is_registered_doctor(session, hh_number).await,
            Role::Diagnostic => {
                self.gateway
                    .is_registered_diagnostic(session, hh_number)
                    .await
            }
        }
    }

    /// Profile of `hh_number` as currently held by `role`'s registry.
    pub async fn details(
        &self,
        session: &SessionContext,
        role: Role,
        hh_number: &HhNumber,
    ) -> Result<ActorDetails, Error> {
        Ok(match role {
            Role::Patient => {
                ActorDetails::Patient(self.gateway.patient_details(session, hh_number).await?)
            }
            Role::Doctor => {
                ActorDetails::Doctor(self.gateway.doctor_details(session, hh_number).await?)
            }
            Role::Diagnostic => ActorDetails::Diagnostic(
                self.gateway.diagnostic_details(session, hh_number).await?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::test_fixtures::{DIAGNOSTIC_WALLET, MockContracts, address, session};
    use crate::domain::{DiagnosticDetails, ErrorCode};
    use rstest::rstest;

    fn form(password: &str) -> FormValues {
        FormValues::new()
            .with("hhNumber", "111111")
            .with("password", password)
    }

    fn diagnostic_details() -> DiagnosticDetails {
        DiagnosticDetails {
            wallet_address: address(DIAGNOSTIC_WALLET),
            name: "City Labs".to_owned(),
            hospital_name: "City Hospital".to_owned(),
            location: "Downtown".to_owned(),
            email: "labs@example.com".to_owned(),
        }
    }

    #[rstest]
    #[case(Role::Patient, "Patient not registered")]
    #[case(Role::Doctor, "Doctor not registered")]
    #[case(Role::Diagnostic, "Diagnostic center not registered")]
    #[tokio::test]
    async fn unregistered_identity_is_reported(#[case] role: Role, #[case] message: &str) {
        let mut contracts = MockContracts::default();
        contracts
            .patients
            .expect_is_registered_patient()
            .returning(|_, _| Ok(false));
        contracts
            .doctors
            .expect_is_registered_doctor()
            .returning(|_, _| Ok(false));
        contracts
            .diagnostics
            .expect_is_registered_diagnostic()
            .returning(|_, _| Ok(false));

        let outcome = LoginService::new(contracts.into_gateway())
            .login(&session(DIAGNOSTIC_WALLET), role, &form("whatever"))
            .await
            .expect("outcome");
        assert_eq!(outcome.message(), message);
    }

    #[tokio::test]
    async fn wrong_password_is_reported() {
        let mut contracts = MockContracts::default();
        contracts
            .diagnostics
            .expect_is_registered_diagnostic()
            .returning(|_, _| Ok(true));
        contracts
            .diagnostics
            .expect_validate_password()
            .withf(|_, _, password| password.expose() == "wrong")
            .returning(|_, _, _| Ok(false));
        contracts.diagnostics.expect_get_diagnostic_details().never();

        let outcome = LoginService::new(contracts.into_gateway())
            .login(&session(DIAGNOSTIC_WALLET), Role::Diagnostic, &form("wrong"))
            .await
            .expect("outcome");
        assert_eq!(outcome, LoginOutcome::IncorrectPassword);
        assert_eq!(outcome.message(), "Incorrect password");
    }

    #[tokio::test]
    async fn successful_login_routes_to_dashboard() {
        let mut contracts = MockContracts::default();
        contracts
            .diagnostics
            .expect_is_registered_diagnostic()
            .returning(|_, _| Ok(true));
        contracts
            .diagnostics
            .expect_validate_password()
            .returning(|_, _, _| Ok(true));
        contracts
            .diagnostics
            .expect_get_diagnostic_details()
            .returning(|_, _| Ok(diagnostic_details()));

        let outcome = LoginService::new(contracts.into_gateway())
            .login(&session(DIAGNOSTIC_WALLET), Role::Diagnostic, &form("labs-pass-1"))
            .await
            .expect("outcome");
        assert_eq!(
            outcome.route().map(Route::path).as_deref(),
            Some("/diagnostic/111111")
        );
    }

    #[tokio::test]
    async fn blank_login_issues_no_call() {
        let err = LoginService::new(MockContracts::default().into_gateway())
            .login(&session(DIAGNOSTIC_WALLET), Role::Patient, &FormValues::new())
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
