//! Tests for the contract gateway.

use mockall::predicate::eq;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::NetworkId;
use crate::domain::test_fixtures::{
    DOCTOR_WALLET, MockContracts, PATIENT_WALLET, address, contract_address, hh, session,
};

#[tokio::test]
async fn calls_use_the_deployed_address_for_the_session_network() {
    let mut contracts = MockContracts::default();
    contracts
        .patients
        .expect_is_registered_patient()
        .withf(|ctx, hh_number| {
            ctx.contract == contract_address(ContractKind::PatientRegistration)
                && hh_number.as_ref() == "123456"
        })
        .times(1)
        .returning(|_, _| Ok(true));
    let gateway = contracts.into_gateway();

    let registered = gateway
        .is_registered_patient(&session(PATIENT_WALLET), &hh("123456"))
        .await
        .expect("call succeeds");
    assert!(registered);
}

#[tokio::test]
async fn unknown_network_fails_before_any_call() {
    let gateway = MockContracts::default().into_gateway();
    let foreign = SessionContext::new(NetworkId::new(5777), address(PATIENT_WALLET));

    let err = gateway
        .is_registered_patient(&foreign, &hh("123456"))
        .await
        .expect_err("not deployed");
    assert_eq!(err.code(), ErrorCode::ContractNotDeployed);
}

#[tokio::test]
async fn sends_are_signed_by_the_requested_account() {
    let mut contracts = MockContracts::default();
    contracts
        .records
        .expect_add_record()
        .withf(|ctx, timestamp, content_hash| {
            ctx.from == address(PATIENT_WALLET)
                && ctx.contract == contract_address(ContractKind::UploadEhr)
                && timestamp == "2026-10-19 10:00:00"
                && content_hash.as_ref() == "QmHash"
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let gateway = contracts.into_gateway();

    gateway
        .add_record(
            &session(PATIENT_WALLET),
            &address(PATIENT_WALLET),
            "2026-10-19 10:00:00",
            &ContentHash::new("QmHash").expect("hash"),
        )
        .await
        .expect("send succeeds");
}

#[tokio::test]
async fn provider_failures_become_transaction_failures() {
    let mut contracts = MockContracts::default();
    contracts
        .doctors
        .expect_revoke_permission()
        .with(mockall::predicate::always(), eq(hh("123456")), eq(hh("654321")))
        .times(1)
        .returning(|_, _, _| Err(ContractCallError::reverted("permission not found")));
    let gateway = contracts.into_gateway();

    let err = gateway
        .revoke_permission(
            &session(PATIENT_WALLET),
            &address(PATIENT_WALLET),
            &hh("123456"),
            &hh("654321"),
        )
        .await
        .expect_err("reverted");
    assert_eq!(err.code(), ErrorCode::TransactionFailed);
    assert_eq!(err.message(), "permission not found");
}

#[tokio::test]
async fn sends_for_another_account_are_refused_before_the_port() {
    // No expectations: any port call would panic.
    let gateway = MockContracts::default().into_gateway();

    let err = gateway
        .add_record(
            &session(DOCTOR_WALLET),
            &address(PATIENT_WALLET),
            "2026-10-19 10:00:00",
            &ContentHash::new("QmHash").expect("hash"),
        )
        .await
        .expect_err("sender mismatch");
    assert_eq!(err.code(), ErrorCode::TransactionFailed);
    assert_eq!(
        err.message(),
        format!("Sender {PATIENT_WALLET} is not the connected account")
    );
}

#[tokio::test]
async fn sender_match_ignores_address_case() {
    let mut contracts = MockContracts::default();
    contracts
        .records
        .expect_add_record()
        .times(1)
        .returning(|_, _, _| Ok(()));
    let gateway = contracts.into_gateway();

    gateway
        .add_record(
            &session(&PATIENT_WALLET.to_lowercase()),
            &address(PATIENT_WALLET),
            "2026-10-19 10:00:00",
            &ContentHash::new("QmHash").expect("hash"),
        )
        .await
        .expect("same account");
}
