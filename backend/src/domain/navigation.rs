//! Portal page paths that workflows navigate to on success.

use std::fmt;

use serde::{Serialize, Serializer};

use super::{HhNumber, Role};

/// Client-side page, keyed by role and HH number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    PatientDashboard(HhNumber),
    PatientRecords(HhNumber),
    PatientGrantPermission(HhNumber),
    PatientProfile(HhNumber),
    PatientUpload(HhNumber),
    DoctorDashboard(HhNumber),
    DoctorPatientList(HhNumber),
    DoctorProfile(HhNumber),
    DoctorForm(HhNumber),
    DiagnosticDashboard(HhNumber),
    DiagnosticForm(HhNumber),
    DiagnosticProfile(HhNumber),
}

impl Route {
    /// Landing page after a successful login.
    pub fn dashboard(role: Role, hh_number: HhNumber) -> Self {
        match role {
            Role::Patient => Self::PatientDashboard(hh_number),
            Role::Doctor => Self::DoctorDashboard(hh_number),
            Role::Diagnostic => Self::DiagnosticDashboard(hh_number),
        }
    }

    /// Rendered path.
    ///
    /// # Examples
    /// ```
    /// use ehr_backend::domain::{HhNumber, Route};
    ///
    /// let hh = HhNumber::new("123456").unwrap();
    /// assert_eq!(Route::DoctorPatientList(hh).path(), "/doctor/123456/patientlist");
    /// assert_eq!(Route::Home.path(), "/");
    /// ```
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::PatientDashboard(hh) => format!("/patient/{hh}"),
            Self::PatientRecords(hh) => format!("/patient/{hh}/viewrecords"),
            Self::PatientGrantPermission(hh) => format!("/patient/{hh}/grantpermission"),
            Self::PatientProfile(hh) => format!("/patient/{hh}/viewprofile"),
            Self::PatientUpload(hh) => format!("/patient/{hh}/uploadehr"),
            Self::DoctorDashboard(hh) => format!("/doctor/{hh}"),
            Self::DoctorPatientList(hh) => format!("/doctor/{hh}/patientlist"),
            Self::DoctorProfile(hh) => format!("/doctor/{hh}/viewdoctorprofile"),
            Self::DoctorForm(hh) => format!("/doctor/{hh}/doctorform"),
            Self::DiagnosticDashboard(hh) => format!("/diagnostic/{hh}"),
            Self::DiagnosticForm(hh) => format!("/diagnostic/{hh}/diagnosticform"),
            Self::DiagnosticProfile(hh) => format!("/diagnostic/{hh}/viewdiagnosticprofile"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}
