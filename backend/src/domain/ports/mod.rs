//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Every external collaborator (wallet, contracts, blob store, mail relay,
//! mail transport) is reached through one of these traits. Each exposes a
//! strongly typed error so adapters map their failures into predictable
//! variants.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_store;
mod contract;
mod diagnostic_registry;
mod doctor_registry;
mod patient_registry;
mod prescription_delivery;
mod prescription_relay;
mod record_ledgers;
mod wallet_provider;

#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobStore, BlobStoreError};
pub use contract::{CallContext, ContractCallError, SendContext};
#[cfg(test)]
pub use diagnostic_registry::MockDiagnosticRegistry;
pub use diagnostic_registry::DiagnosticRegistry;
#[cfg(test)]
pub use doctor_registry::MockDoctorRegistry;
pub use doctor_registry::{DoctorRegistry, PatientListEntry};
#[cfg(test)]
pub use patient_registry::MockPatientRegistry;
pub use patient_registry::PatientRegistry;
#[cfg(test)]
pub use prescription_delivery::{
    MockPrescriptionMailer, MockPrescriptionRenderer, MockPrescriptionSpool,
};
pub use prescription_delivery::{
    PrescriptionDeliveryError, PrescriptionEmail, PrescriptionMailer, PrescriptionRenderer,
    PrescriptionSpool, SpooledPrescription,
};
#[cfg(test)]
pub use prescription_relay::MockPrescriptionRelay;
pub use prescription_relay::{PrescriptionRelay, PrescriptionRelayError, PrescriptionRequest};
#[cfg(test)]
pub use record_ledgers::{MockConsultationLedger, MockDiagnosticLedger, MockRecordLedger};
pub use record_ledgers::{ConsultationLedger, DiagnosticLedger, RecordLedger};
#[cfg(test)]
pub use wallet_provider::MockWalletProvider;
pub use wallet_provider::{WalletProvider, WalletProviderError};

#[cfg(test)]
mod tests;
