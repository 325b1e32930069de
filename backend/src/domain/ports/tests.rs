//! Regression coverage for port-owned value types and error constructors.

use super::*;
use rstest::rstest;

#[rstest]
#[case(ContractCallError::rejected("User denied transaction signature"))]
#[case(ContractCallError::reverted("User denied transaction signature"))]
#[case(ContractCallError::transport("User denied transaction signature"))]
fn provider_message_strips_variant_prefix(#[case] error: ContractCallError) {
    assert_eq!(error.provider_message(), "User denied transaction signature");
    assert!(error.to_string().ends_with("User denied transaction signature"));
}

#[test]
fn relay_rejection_renders_status() {
    let error = PrescriptionRelayError::rejected(400_u16, "All fields are required");
    assert_eq!(
        error.to_string(),
        "relay rejected request with status 400: All fields are required"
    );
}

#[rstest]
#[case("", "Flu", "Paracetamol", "a@b.com", false)]
#[case("Jane", "  ", "Paracetamol", "a@b.com", false)]
#[case("Jane", "Flu", "Paracetamol", "", false)]
#[case("Jane", "Flu", "Paracetamol", "a@b.com", true)]
fn prescription_request_completeness(
    #[case] patient_name: &str,
    #[case] diagnosis: &str,
    #[case] medicines: &str,
    #[case] email: &str,
    #[case] expected: bool,
) {
    let request = PrescriptionRequest {
        patient_name: patient_name.to_owned(),
        diagnosis: diagnosis.to_owned(),
        medicines: medicines.to_owned(),
        email: email.to_owned(),
    };
    assert_eq!(request.is_complete(), expected);
}

#[test]
fn prescription_request_tolerates_missing_fields() {
    let request: PrescriptionRequest =
        serde_json::from_str(r#"{"patientName":"Jane"}"#).expect("partial body decodes");
    assert_eq!(request.patient_name, "Jane");
    assert!(!request.is_complete());
}
