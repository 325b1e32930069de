//! Tests for the registration workflow.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::test_fixtures::{
    DIAGNOSTIC_WALLET, DOCTOR_WALLET, MockContracts, PATIENT_WALLET, address, session,
};
use crate::domain::ErrorCode;
use crate::domain::ports::ContractCallError;

#[fixture]
fn patient_form() -> FormValues {
    FormValues::new()
        .with("walletAddress", PATIENT_WALLET)
        .with("name", "Jane Doe")
        .with("dateOfBirth", "1990-01-01")
        .with("gender", "Female")
        .with("bg", "O+")
        .with("homeAddress", "1 Main St")
        .with("email", "jane@example.com")
        .with("hhNumber", "123456")
        .with("password", "password1")
        .with("confirmPassword", "password1")
}

fn service(contracts: MockContracts) -> RegistrationService {
    RegistrationService::new(contracts.into_gateway(), InFlightRegistry::new())
}

#[rstest]
#[tokio::test]
async fn registers_new_patient_and_returns_home(patient_form: FormValues) {
    let mut contracts = MockContracts::default();
    contracts
        .patients
        .expect_is_registered_patient()
        .times(1)
        .returning(|_, _| Ok(false));
    contracts
        .patients
        .expect_register_patient()
        .withf(|ctx, registration| {
            ctx.from == address(PATIENT_WALLET)
                && registration.name == "Jane Doe"
                && registration.hh_number.as_ref() == "123456"
                && registration.password.expose() == "password1"
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let outcome = service(contracts)
        .register_patient(&session(PATIENT_WALLET), &patient_form)
        .await
        .expect("registered");
    assert_eq!(outcome.message(), "Patient registered successfully!");
    assert_eq!(outcome.route(), Some(&Route::Home));
}

#[rstest]
#[tokio::test]
async fn existing_patient_is_not_registered_again(patient_form: FormValues) {
    let mut contracts = MockContracts::default();
    contracts
        .patients
        .expect_is_registered_patient()
        .returning(|_, _| Ok(true));
    contracts.patients.expect_register_patient().never();

    let outcome = service(contracts)
        .register_patient(&session(PATIENT_WALLET), &patient_form)
        .await
        .expect("guarded");
    assert_eq!(outcome.message(), "Patient already exists");
    assert!(outcome.route().is_none());
}

#[rstest]
#[case("name")]
#[case("email")]
#[case("hhNumber")]
#[case("password")]
#[case("confirmPassword")]
#[tokio::test]
async fn empty_required_field_issues_no_contract_call(
    mut patient_form: FormValues,
    #[case] field: &str,
) {
    patient_form.set(field, "");
    let err = service(MockContracts::default())
        .register_patient(&session(PATIENT_WALLET), &patient_form)
        .await
        .expect_err("invalid form");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert!(err.details().is_some_and(|d| d["fieldErrors"].get(field).is_some()));
}

#[rstest]
#[tokio::test]
async fn revert_surfaces_as_transaction_failure(patient_form: FormValues) {
    let mut contracts = MockContracts::default();
    contracts
        .patients
        .expect_is_registered_patient()
        .returning(|_, _| Ok(false));
    contracts
        .patients
        .expect_register_patient()
        .returning(|_, _| Err(ContractCallError::rejected("User denied transaction signature")));

    let err = service(contracts)
        .register_patient(&session(PATIENT_WALLET), &patient_form)
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::TransactionFailed);
    assert_eq!(err.message(), "User denied transaction signature");
}

#[tokio::test]
async fn registers_doctor_from_doctor_address() {
    let form = FormValues::new()
        .with("doctorAddress", DOCTOR_WALLET)
        .with("doctorName", "Dr Grey")
        .with("hospitalName", "Seattle Grace")
        .with("hospitalLocation", "Seattle")
        .with("dateOfBirth", "1980-03-03")
        .with("gender", "Female")
        .with("email", "grey@example.com")
        .with("hhNumber", "654321")
        .with("specialization", "Surgery")
        .with("department", "General")
        .with("designation", "Resident")
        .with("workExperience", "5")
        .with("password", "scalpel-123")
        .with("confirmPassword", "scalpel-123");
    let mut contracts = MockContracts::default();
    contracts
        .doctors
        .expect_is_registered_doctor()
        .returning(|_, _| Ok(false));
    contracts
        .doctors
        .expect_register_doctor()
        .withf(|ctx, _| ctx.from == address(DOCTOR_WALLET))
        .times(1)
        .returning(|_, _| Ok(()));

    let outcome = service(contracts)
        .register_doctor(&session(DOCTOR_WALLET), &form)
        .await
        .expect("registered");
    assert_eq!(outcome.message(), "Doctor registered successfully!");
}

#[tokio::test]
async fn existing_diagnostic_centre_is_reported() {
    let form = FormValues::new()
        .with("diagnosticAddress", DIAGNOSTIC_WALLET)
        .with("diagnosticName", "City Labs")
        .with("hospitalName", "City Hospital")
        .with("diagnosticLocation", "Downtown")
        .with("email", "labs@example.com")
        .with("hhNumber", "111111")
        .with("password", "labs-pass-1")
        .with("confirmPassword", "labs-pass-1");
    let mut contracts = MockContracts::default();
    contracts
        .diagnostics
        .expect_is_registered_diagnostic()
        .returning(|_, _| Ok(true));
    contracts.diagnostics.expect_register_diagnostic().never();

    let outcome = service(contracts)
        .register_diagnostic(&session(DIAGNOSTIC_WALLET), &form)
        .await
        .expect("guarded");
    assert_eq!(outcome.message(), "Diagnostic already exists");
}
