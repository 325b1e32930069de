//! Registration commands and profile projections for the three actor roles.
//!
//! Commands are built from validated forms and handed to the registry ports.
//! Details are what the registries return on read; they are never cached.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{AccountAddress, HhNumber};

/// Credential checked by the registration contract, never by this layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Wrap a raw password.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Raw password, for handing to the contract call.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(**redacted**)")
    }
}

/// Login form contents: the identity key and the password to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub hh_number: HhNumber,
    pub password: Credential,
}

/// Arguments of `registerPatient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRegistration {
    pub wallet_address: AccountAddress,
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_group: String,
    pub home_address: String,
    pub email: String,
    pub hh_number: HhNumber,
    pub password: Credential,
}

/// Arguments of `registerDoctor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorRegistration {
    pub wallet_address: AccountAddress,
    pub name: String,
    pub hospital_name: String,
    pub hospital_location: String,
    pub date_of_birth: String,
    pub gender: String,
    pub email: String,
    pub hh_number: HhNumber,
    pub specialization: String,
    pub department: String,
    pub designation: String,
    pub work_experience: String,
    pub password: Credential,
}

/// Arguments of `registerDiagnostic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRegistration {
    pub wallet_address: AccountAddress,
    pub name: String,
    pub hospital_name: String,
    pub location: String,
    pub email: String,
    pub hh_number: HhNumber,
    pub password: Credential,
}

/// Result of `getPatientDetails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetails {
    pub wallet_address: AccountAddress,
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub blood_group: String,
    pub home_address: String,
    pub email: String,
}

/// Result of `getDoctorDetails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetails {
    pub wallet_address: AccountAddress,
    pub name: String,
    pub hospital_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub email: String,
    pub specialization: String,
    pub department: String,
    pub designation: String,
    pub work_experience: String,
}

/// Result of `getDiagnosticDetails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticDetails {
    pub wallet_address: AccountAddress,
    pub name: String,
    pub hospital_name: String,
    pub location: String,
    pub email: String,
}

/// Profile projection for any role, returned after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ActorDetails {
    Patient(PatientDetails),
    Doctor(DoctorDetails),
    Diagnostic(DiagnosticDetails),
}

impl From<&PatientRegistration> for PatientDetails {
    fn from(value: &PatientRegistration) -> Self {
        Self {
            wallet_address: value.wallet_address.clone(),
            name: value.name.clone(),
            date_of_birth: value.date_of_birth.clone(),
            gender: value.gender.clone(),
            blood_group: value.blood_group.clone(),
            home_address: value.home_address.clone(),
            email: value.email.clone(),
        }
    }
}

impl From<&DoctorRegistration> for DoctorDetails {
    fn from(value: &DoctorRegistration) -> Self {
        Self {
            wallet_address: value.wallet_address.clone(),
            name: value.name.clone(),
            hospital_name: value.hospital_name.clone(),
            date_of_birth: value.date_of_birth.clone(),
            gender: value.gender.clone(),
            email: value.email.clone(),
            specialization: value.specialization.clone(),
            department: value.department.clone(),
            designation: value.designation.clone(),
            work_experience: value.work_experience.clone(),
        }
    }
}

impl From<&DiagnosticRegistration> for DiagnosticDetails {
    fn from(value: &DiagnosticRegistration) -> Self {
        Self {
            wallet_address: value.wallet_address.clone(),
            name: value.name.clone(),
            hospital_name: value.hospital_name.clone(),
            location: value.location.clone(),
            email: value.email.clone(),
        }
    }
}
