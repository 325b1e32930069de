//! Shared doubles for workflow tests.
//!
//! Every mock starts with no expectations, so any contract call a test did
//! not ask for fails the test.

use std::sync::Arc;

use crate::domain::ports::{
    MockConsultationLedger, MockDiagnosticLedger, MockDiagnosticRegistry, MockDoctorRegistry,
    MockPatientRegistry, MockRecordLedger,
};
use crate::domain::{
    AccountAddress, ContractAddressBook, ContractGateway, ContractKind, ContractPorts, HhNumber,
    NetworkId, SessionContext,
};

pub(crate) const PATIENT_WALLET: &str = "0xb49bbaC7E687a50DCbb2d92341b4184B22ccA6fd";
pub(crate) const DOCTOR_WALLET: &str = "0x2546BcD3c84621e976D8185a91A922aE77ECEc30";
pub(crate) const DIAGNOSTIC_WALLET: &str = "0xbDA5747bFD65F08deb54cb465eB87D40e51B197E";

pub(crate) fn address(raw: &str) -> AccountAddress {
    AccountAddress::new(raw).expect("fixture address")
}

pub(crate) fn hh(raw: &str) -> HhNumber {
    HhNumber::new(raw).expect("fixture hh number")
}

pub(crate) fn contract_address(kind: ContractKind) -> AccountAddress {
    let index = ContractKind::ALL
        .iter()
        .position(|candidate| *candidate == kind)
        .expect("known contract");
    address(&format!("0x{:040x}", index + 1))
}

pub(crate) fn address_book() -> ContractAddressBook {
    ContractKind::ALL
        .into_iter()
        .fold(ContractAddressBook::new(), |book, kind| {
            book.with(kind, NetworkId::SEPOLIA, contract_address(kind))
        })
}

pub(crate) fn session(wallet: &str) -> SessionContext {
    SessionContext::new(NetworkId::SEPOLIA, address(wallet))
}

/// Mock contract ports, converted into a gateway once configured.
#[derive(Default)]
pub(crate) struct MockContracts {
    pub patients: MockPatientRegistry,
    pub doctors: MockDoctorRegistry,
    pub diagnostics: MockDiagnosticRegistry,
    pub consultations: MockConsultationLedger,
    pub diagnostic_reports: MockDiagnosticLedger,
    pub records: MockRecordLedger,
}

impl MockContracts {
    pub fn into_gateway(self) -> ContractGateway {
        ContractGateway::new(
            ContractPorts {
                patients: Arc::new(self.patients),
                doctors: Arc::new(self.doctors),
                diagnostics: Arc::new(self.diagnostics),
                consultations: Arc::new(self.consultations),
                diagnostic_reports: Arc::new(self.diagnostic_reports),
                records: Arc::new(self.records),
            },
            address_book(),
        )
    }
}
