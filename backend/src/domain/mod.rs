//! Domain primitives, ports, and workflows.
//!
//! Purpose: Define strongly typed identities, records, and the workflows
//! that coordinate the wallet, the registration and record contracts, the
//! blob store, and the prescription relay. Adapters live under `outbound`
//! and `inbound`; nothing here performs I/O directly.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload shared by every workflow.
//! - HhNumber, AccountAddress, NetworkId, Role: validated identities.
//! - SessionResolver, ContractAddressBook, ContractGateway: contract access.
//! - RegistrationService, LoginService, PermissionService, RecordService:
//!   portal workflows.
//! - PrescriptionDispatcher: relay-side delivery.

pub mod error;
pub mod gateway;
pub mod identity;
pub mod in_flight;
pub mod login_service;
pub mod navigation;
pub mod permission;
pub mod ports;
pub mod prescription;
pub mod record_service;
pub mod records;
pub mod registration;
pub mod registration_service;
pub mod session;
pub mod trace_id;
pub mod validation;

#[cfg(test)]
mod test_fixtures;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gateway::{ContractGateway, ContractPorts};
pub use self::identity::{AccountAddress, HhNumber, IdentityValidationError, NetworkId, Role};
pub use self::in_flight::{InFlightGuard, InFlightRegistry, Operation, OperationKey};
pub use self::login_service::{LoginOutcome, LoginService};
pub use self::navigation::Route;
pub use self::permission::{PermissionOutcome, PermissionService};
pub use self::prescription::PrescriptionDispatcher;
pub use self::record_service::{
    RECORD_TIMESTAMP_FORMAT, RecordOutcome, RecordService, RecordServiceDeps,
};
pub use self::records::{
    Consultation, ContentHash, DiagnosticReport, MedicalRecord, RecordId, RecordValidationError,
    RecordView,
};
pub use self::registration::{
    ActorDetails, Credential, DiagnosticDetails, DiagnosticRegistration, DoctorDetails,
    DoctorRegistration, LoginCredentials, PatientDetails, PatientRegistration,
};
pub use self::registration_service::{RegistrationOutcome, RegistrationService};
pub use self::session::{
    AddressBookError, ContractAddressBook, ContractKind, SessionContext, SessionResolver,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use ehr_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("no such patient"))
/// }
/// # assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
