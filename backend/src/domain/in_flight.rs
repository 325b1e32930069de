//! Per-operation in-flight lock guarding against double submission.
//!
//! A workflow acquires an [`InFlightGuard`] for its [`OperationKey`] before
//! issuing any contract call. A second acquisition of the same key fails
//! with [`ErrorCode::Conflict`](super::ErrorCode) until the guard drops.
//!
//! HH numbers are only unique within one registry, so keys are scoped by
//! [`Role`] as well.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::{Error, HhNumber, Role};

/// Logical operation name used in lock keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    GrantPermission,
    RevokePermission,
    RemovePatient,
    UploadRecord,
    CreateConsultation,
    CreateDiagnosticReport,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("register"),
            Self::GrantPermission => f.write_str("grant_permission"),
            Self::RevokePermission => f.write_str("revoke_permission"),
            Self::RemovePatient => f.write_str("remove_patient"),
            Self::UploadRecord => f.write_str("upload_record"),
            Self::CreateConsultation => f.write_str("create_consultation"),
            Self::CreateDiagnosticReport => f.write_str("create_diagnostic_report"),
        }
    }
}

/// Acting role, identifier, and operation; at most one holder at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub role: Role,
    pub subject: HhNumber,
    pub operation: Operation,
}

impl OperationKey {
    pub fn new(role: Role, subject: HhNumber, operation: Operation) -> Self {
        Self {
            role,
            subject,
            operation,
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.role.label().to_ascii_lowercase(),
            self.subject,
            self.operation
        )
    }
}

type Held = Arc<Mutex<HashSet<OperationKey>>>;

/// Registry of operations currently in progress.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    held: Held,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, failing if another caller holds it.
    ///
    /// # Examples
    /// ```
    /// use ehr_backend::domain::{HhNumber, InFlightRegistry, Operation, OperationKey, Role};
    ///
    /// let registry = InFlightRegistry::new();
    /// let key = OperationKey::new(
    ///     Role::Patient,
    ///     HhNumber::new("123456").unwrap(),
    ///     Operation::GrantPermission,
    /// );
    /// let guard = registry.try_acquire(key.clone()).expect("first claim");
    /// assert!(registry.try_acquire(key.clone()).is_err());
    /// drop(guard);
    /// assert!(registry.try_acquire(key).is_ok());
    /// ```
    pub fn try_acquire(&self, key: OperationKey) -> Result<InFlightGuard, Error> {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        if !held.insert(key.clone()) {
            debug!(%key, "rejecting concurrent submission");
            return Err(Error::conflict("operation already in progress"));
        }
        Ok(InFlightGuard {
            held: Arc::clone(&self.held),
            key,
        })
    }

    /// `true` while `key` is held.
    pub fn is_held(&self, key: &OperationKey) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// Releases its key on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    held: Held,
    key: OperationKey,
}

impl InFlightGuard {
    pub fn key(&self) -> &OperationKey {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
