//! Typed capability port for the diagnostic centre registration contract.

use async_trait::async_trait;

use crate::domain::{Credential, DiagnosticDetails, DiagnosticRegistration, HhNumber};

use super::{CallContext, ContractCallError, SendContext};

/// Diagnostic centre registration contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagnosticRegistry: Send + Sync {
    /// `registerDiagnostic(...)`.
    async fn register_diagnostic(
        &self,
        ctx: &SendContext,
        registration: &DiagnosticRegistration,
    ) -> Result<(), ContractCallError>;

    /// `isRegisteredDiagnostic(hhNumber)`.
    async fn is_registered_diagnostic(
        &self,
        ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<bool, ContractCallError>;

    /// `validatePassword(hhNumber, password)`.
    async fn validate_password(
        &self,
        ctx: &CallContext,
        hh_number: &HhNumber,
        password: &Credential,
    ) -> Result<bool, ContractCallError>;

    /// `getDiagnosticDetails(hhNumber)`.
    async fn get_diagnostic_details(
        &self,
        ctx: &CallContext,
        hh_number: &HhNumber,
    ) -> Result<DiagnosticDetails, ContractCallError>;
}
