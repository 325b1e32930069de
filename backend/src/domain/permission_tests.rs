//! Tests for the permission workflow.

use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::test_fixtures::{
    DOCTOR_WALLET, MockContracts, PATIENT_WALLET, address, hh, session,
};
use crate::domain::{DoctorDetails, ErrorCode, PatientDetails};

const PATIENT: &str = "123456";
const DOCTOR: &str = "654321";

fn patient_details() -> PatientDetails {
    PatientDetails {
        wallet_address: address(PATIENT_WALLET),
        name: "Jane".to_owned(),
        date_of_birth: "1990-01-01".to_owned(),
        gender: "Female".to_owned(),
        blood_group: "O+".to_owned(),
        home_address: "1 Main St".to_owned(),
        email: "jane@example.com".to_owned(),
    }
}

fn doctor_details() -> DoctorDetails {
    DoctorDetails {
        wallet_address: address(DOCTOR_WALLET),
        name: "Dr Grey".to_owned(),
        hospital_name: "Seattle Grace".to_owned(),
        date_of_birth: "1980-03-03".to_owned(),
        gender: "Female".to_owned(),
        email: "grey@example.com".to_owned(),
        specialization: "Surgery".to_owned(),
        department: "General".to_owned(),
        designation: "Resident".to_owned(),
        work_experience: "5".to_owned(),
    }
}

#[fixture]
fn contracts() -> MockContracts {
    MockContracts::default()
}

fn with_doctor(contracts: &mut MockContracts, registered: bool) {
    contracts
        .doctors
        .expect_is_registered_doctor()
        .with(always(), eq(hh(DOCTOR)))
        .times(1)
        .returning(move |_, _| Ok(registered));
}

fn with_edge(contracts: &mut MockContracts, granted: bool) {
    contracts
        .doctors
        .expect_is_permission_granted()
        .with(always(), eq(hh(PATIENT)), eq(hh(DOCTOR)))
        .times(1)
        .returning(move |_, _, _| Ok(granted));
}

fn service(contracts: MockContracts) -> PermissionService {
    PermissionService::new(contracts.into_gateway(), InFlightRegistry::new())
}

#[rstest]
#[tokio::test]
async fn grant_sends_from_the_patient_wallet(mut contracts: MockContracts) {
    with_doctor(&mut contracts, true);
    with_edge(&mut contracts, false);
    contracts
        .patients
        .expect_get_patient_details()
        .times(1)
        .returning(|_, _| Ok(patient_details()));
    contracts
        .doctors
        .expect_grant_permission()
        .withf(|ctx, patient, doctor, name| {
            ctx.from == address(PATIENT_WALLET)
                && patient.as_ref() == PATIENT
                && doctor.as_ref() == DOCTOR
                && name == "Jane"
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let outcome = service(contracts)
        .grant(&session(PATIENT_WALLET), &hh(PATIENT), DOCTOR)
        .await
        .expect("grant succeeds");
    assert_eq!(outcome.message(), "Access granted successfully.");
    assert_eq!(
        outcome.route().map(Route::path).as_deref(),
        Some("/patient/123456")
    );
}

#[rstest]
#[tokio::test]
async fn grant_from_the_doctor_wallet_is_not_signed(mut contracts: MockContracts) {
    with_doctor(&mut contracts, true);
    with_edge(&mut contracts, false);
    contracts
        .patients
        .expect_get_patient_details()
        .times(1)
        .returning(|_, _| Ok(patient_details()));
    contracts.doctors.expect_grant_permission().never();

    let err = service(contracts)
        .grant(&session(DOCTOR_WALLET), &hh(PATIENT), DOCTOR)
        .await
        .expect_err("patient wallet must sign");
    assert_eq!(err.code(), ErrorCode::TransactionFailed);
}

#[rstest]
#[tokio::test]
async fn grant_when_already_granted_sends_nothing(mut contracts: MockContracts) {
    with_doctor(&mut contracts, true);
    with_edge(&mut contracts, true);
    contracts.doctors.expect_grant_permission().never();

    let outcome = service(contracts)
        .grant(&session(PATIENT_WALLET), &hh(PATIENT), DOCTOR)
        .await
        .expect("guarded");
    assert_eq!(outcome, PermissionOutcome::AlreadyGranted);
    assert_eq!(outcome.message(), "Access is already given!");
    assert!(outcome.route().is_none());
}

#[rstest]
#[tokio::test]
async fn revoke_when_not_granted_sends_nothing(mut contracts: MockContracts) {
    with_doctor(&mut contracts, true);
    with_edge(&mut contracts, false);
    contracts.doctors.expect_revoke_permission().never();

    let outcome = service(contracts)
        .revoke(&session(PATIENT_WALLET), &hh(PATIENT), DOCTOR)
        .await
        .expect("guarded");
    assert_eq!(outcome, PermissionOutcome::NotGranted);
    assert_eq!(outcome.message(), "Access was not granted to this doctor.");
}

#[rstest]
#[tokio::test]
async fn revoke_sends_when_granted(mut contracts: MockContracts) {
    with_doctor(&mut contracts, true);
    with_edge(&mut contracts, true);
    contracts
        .patients
        .expect_get_patient_details()
        .returning(|_, _| Ok(patient_details()));
    contracts
        .doctors
        .expect_revoke_permission()
        .withf(|ctx, _, _| ctx.from == address(PATIENT_WALLET))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let outcome = service(contracts)
        .revoke(&session(PATIENT_WALLET), &hh(PATIENT), DOCTOR)
        .await
        .expect("revoke succeeds");
    assert_eq!(outcome.message(), "Access removed successfully.");
}

#[rstest]
#[case::grant(true)]
#[case::revoke(false)]
#[tokio::test]
async fn unknown_doctor_short_circuits(mut contracts: MockContracts, #[case] grant: bool) {
    with_doctor(&mut contracts, false);
    contracts.doctors.expect_is_permission_granted().never();

    let service = service(contracts);
    let session = session(PATIENT_WALLET);
    let outcome = if grant {
        service.grant(&session, &hh(PATIENT), DOCTOR).await
    } else {
        service.revoke(&session, &hh(PATIENT), DOCTOR).await
    }
    .expect("guarded");
    assert_eq!(outcome.message(), "Doctor does not exist!");
}

#[rstest]
#[tokio::test]
async fn malformed_doctor_number_is_rejected_before_any_call(contracts: MockContracts) {
    let err = service(contracts)
        .grant(&session(PATIENT_WALLET), &hh(PATIENT), "12a")
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    let details = err.details().expect("field errors");
    assert_eq!(
        details["fieldErrors"]["doctorNumber"],
        "Please enter a 6-digit HH Number."
    );
}

#[rstest]
#[tokio::test]
async fn concurrent_grant_is_rejected_while_one_is_in_flight(contracts: MockContracts) {
    let registry = InFlightRegistry::new();
    let service = PermissionService::new(contracts.into_gateway(), registry.clone());
    let _held = registry
        .try_acquire(OperationKey::new(Role::Patient, hh(PATIENT), Operation::GrantPermission))
        .expect("claim");

    let err = service
        .grant(&session(PATIENT_WALLET), &hh(PATIENT), DOCTOR)
        .await
        .expect_err("double submit");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn remove_patient_signs_with_doctor_wallet_and_refreshes(mut contracts: MockContracts) {
    contracts
        .doctors
        .expect_get_doctor_details()
        .times(1)
        .returning(|_, _| Ok(doctor_details()));
    contracts
        .doctors
        .expect_revoke_permission()
        .withf(|ctx, patient, doctor| {
            ctx.from == address(DOCTOR_WALLET)
                && patient.as_ref() == PATIENT
                && doctor.as_ref() == DOCTOR
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    contracts
        .doctors
        .expect_get_patient_list()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let list = service(contracts)
        .remove_patient(&session(DOCTOR_WALLET), &hh(DOCTOR), &hh(PATIENT))
        .await
        .expect("removed");
    assert!(list.is_empty());
}
