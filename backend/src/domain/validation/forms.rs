//! Form schemas used by the portal and conversions into typed commands.

use super::{Check, FieldErrors, FieldRule, FormSchema, FormValues, PASSWORD_MIN_LEN, Presence};
use crate::domain::{
    AccountAddress, Consultation, ContentHash, Credential, DiagnosticRegistration,
    DiagnosticReport, DoctorRegistration, HhNumber, LoginCredentials, PatientRegistration,
    RecordId,
};

const HH_NUMBER_CHECK: Check = Check::HhNumber {
    message: "HH Number must be 6 digits",
};
const PASSWORD_LENGTH_CHECK: Check = Check::MinLength {
    min: PASSWORD_MIN_LEN,
    message: "Password must be at least 8 characters",
};
const CONFIRM_CHECK: Check = Check::Matches {
    field: "password",
    message: "Passwords do not match",
};

const fn text(name: &'static str, required_message: &'static str) -> FieldRule {
    FieldRule {
        name,
        presence: Presence::Trimmed,
        required_message,
        checks: &[],
    }
}

const fn wallet(name: &'static str) -> FieldRule {
    FieldRule {
        name,
        presence: Presence::Trimmed,
        required_message: "Wallet address is required",
        checks: &[Check::Address],
    }
}

const EMAIL_FIELD: FieldRule = FieldRule {
    name: "email",
    presence: Presence::Trimmed,
    required_message: "Email is required",
    checks: &[Check::Email],
};
const HH_NUMBER_FIELD: FieldRule = FieldRule {
    name: "hhNumber",
    presence: Presence::Trimmed,
    required_message: "HH Number is required",
    checks: &[HH_NUMBER_CHECK],
};
const PASSWORD_FIELD: FieldRule = FieldRule {
    name: "password",
    presence: Presence::Raw,
    required_message: "Password is required",
    checks: &[PASSWORD_LENGTH_CHECK],
};
const CONFIRM_FIELD: FieldRule = FieldRule {
    name: "confirmPassword",
    presence: Presence::Raw,
    required_message: "Please confirm password",
    checks: &[CONFIRM_CHECK],
};

/// Patient self-registration.
pub const PATIENT_REGISTRATION_FORM: FormSchema = FormSchema {
    name: "patient_registration",
    fields: &[
        wallet("walletAddress"),
        text("name", "Full name is required"),
        text("dateOfBirth", "Date of birth is required"),
        text("gender", "Gender is required"),
        text("bg", "Blood group is required"),
        text("homeAddress", "Home address is required"),
        EMAIL_FIELD,
        HH_NUMBER_FIELD,
        PASSWORD_FIELD,
        CONFIRM_FIELD,
    ],
};

/// Doctor registration.
pub const DOCTOR_REGISTRATION_FORM: FormSchema = FormSchema {
    name: "doctor_registration",
    fields: &[
        wallet("doctorAddress"),
        text("doctorName", "Full name is required"),
        text("hospitalName", "Hospital name is required"),
        text("hospitalLocation", "Hospital location is required"),
        text("dateOfBirth", "Date of birth is required"),
        text("gender", "Gender is required"),
        EMAIL_FIELD,
        HH_NUMBER_FIELD,
        text("specialization", "Specialization is required"),
        text("department", "Department is required"),
        text("designation", "Designation is required"),
        text("workExperience", "Work experience is required"),
        PASSWORD_FIELD,
        CONFIRM_FIELD,
    ],
};

/// Diagnostic centre registration.
pub const DIAGNOSTIC_REGISTRATION_FORM: FormSchema = FormSchema {
    name: "diagnostic_registration",
    fields: &[
        wallet("diagnosticAddress"),
        text("diagnosticName", "Diagnostic center name is required"),
        text("hospitalName", "Hospital name is required"),
        text("diagnosticLocation", "Location is required"),
        EMAIL_FIELD,
        HH_NUMBER_FIELD,
        PASSWORD_FIELD,
        CONFIRM_FIELD,
    ],
};

/// Login for any role. Format is left to the contract.
pub const LOGIN_FORM: FormSchema = FormSchema {
    name: "login",
    fields: &[
        text("hhNumber", "HH Number is required"),
        FieldRule {
            name: "password",
            presence: Presence::Raw,
            required_message: "Password is required",
            checks: &[],
        },
    ],
};

/// Doctor consultation entry.
pub const CONSULTATION_FORM: FormSchema = FormSchema {
    name: "consultation",
    fields: &[
        text("patientName", "patientName is required"),
        text("doctorAddress", "doctorAddress is required"),
        text("gender", "gender is required"),
        text("diagnosis", "diagnosis is required"),
        text("prescription", "prescription is required"),
        text("email", "email is required"),
    ],
};

/// Diagnostic report entry; the attached file is checked separately.
pub const DIAGNOSTIC_REPORT_FORM: FormSchema = FormSchema {
    name: "diagnostic_report",
    fields: &[
        text("patientName", "patientName is required"),
        text("doctorName", "doctorName is required"),
        text("patientAddress", "patientAddress is required"),
        text("diagnosticAddress", "diagnosticAddress is required"),
        text("age", "age is required"),
        text("gender", "gender is required"),
        text("bg", "bg is required"),
    ],
};

const FILE_FIELD: &str = "file";
const DOCTOR_NUMBER_FIELD: &str = "doctorNumber";
const DOCTOR_NUMBER_MESSAGE: &str = "Please enter a 6-digit HH Number.";

fn ensure_valid(schema: &FormSchema, values: &FormValues) -> Result<(), FieldErrors> {
    let errors = schema.validate(values);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn single(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field, message);
    errors
}

fn hh_number(values: &FormValues, field: &str) -> Result<HhNumber, FieldErrors> {
    HhNumber::new(values.trimmed(field)).map_err(|err| single(field, err.to_string()))
}

fn address(values: &FormValues, field: &str) -> Result<AccountAddress, FieldErrors> {
    AccountAddress::new(values.get(field)).map_err(|err| single(field, err.to_string()))
}

/// Validate a patient registration form and build the command.
///
/// # Examples
/// ```
/// use ehr_backend::domain::validation::{FormValues, parse_patient_registration};
///
/// let errors = parse_patient_registration(&FormValues::new()).unwrap_err();
/// assert_eq!(errors.get("name"), Some("Full name is required"));
/// ```
pub fn parse_patient_registration(values: &FormValues) -> Result<PatientRegistration, FieldErrors> {
    ensure_valid(&PATIENT_REGISTRATION_FORM, values)?;
    Ok(PatientRegistration {
        wallet_address: address(values, "walletAddress")?,
        name: values.trimmed("name"),
        date_of_birth: values.trimmed("dateOfBirth"),
        gender: values.trimmed("gender"),
        blood_group: values.trimmed("bg"),
        home_address: values.trimmed("homeAddress"),
        email: values.trimmed("email"),
        hh_number: hh_number(values, "hhNumber")?,
        password: Credential::new(values.get("password")),
    })
}

/// Validate a doctor registration form and build the command.
pub fn parse_doctor_registration(values: &FormValues) -> Result<DoctorRegistration, FieldErrors> {
    ensure_valid(&DOCTOR_REGISTRATION_FORM, values)?;
    Ok(DoctorRegistration {
        wallet_address: address(values, "doctorAddress")?,
        name: values.trimmed("doctorName"),
        hospital_name: values.trimmed("hospitalName"),
        hospital_location: values.trimmed("hospitalLocation"),
        date_of_birth: values.trimmed("dateOfBirth"),
        gender: values.trimmed("gender"),
        email: values.trimmed("email"),
        hh_number: hh_number(values, "hhNumber")?,
        specialization: values.trimmed("specialization"),
        department: values.trimmed("department"),
        designation: values.trimmed("designation"),
        work_experience: values.trimmed("workExperience"),
        password: Credential::new(values.get("password")),
    })
}

/// Validate a diagnostic centre registration form and build the command.
pub fn parse_diagnostic_registration(
    values: &FormValues,
) -> Result<DiagnosticRegistration, FieldErrors> {
    ensure_valid(&DIAGNOSTIC_REGISTRATION_FORM, values)?;
    Ok(DiagnosticRegistration {
        wallet_address: address(values, "diagnosticAddress")?,
        name: values.trimmed("diagnosticName"),
        hospital_name: values.trimmed("hospitalName"),
        location: values.trimmed("diagnosticLocation"),
        email: values.trimmed("email"),
        hh_number: hh_number(values, "hhNumber")?,
        password: Credential::new(values.get("password")),
    })
}

/// Validate a login form.
///
/// Only presence is checked by the form; a malformed HH number can never be
/// registered, so it is reported against the field instead of being sent.
pub fn parse_login(values: &FormValues) -> Result<LoginCredentials, FieldErrors> {
    ensure_valid(&LOGIN_FORM, values)?;
    Ok(LoginCredentials {
        hh_number: hh_number(values, "hhNumber")?,
        password: Credential::new(values.get("password")),
    })
}

/// Validate the doctor number typed on the permission screen.
pub fn parse_doctor_number(raw: &str) -> Result<HhNumber, FieldErrors> {
    HhNumber::new(raw.trim()).map_err(|_| single(DOCTOR_NUMBER_FIELD, DOCTOR_NUMBER_MESSAGE))
}

/// Validate a consultation form and attach `record_id`.
pub fn parse_consultation(
    values: &FormValues,
    record_id: RecordId,
) -> Result<Consultation, FieldErrors> {
    ensure_valid(&CONSULTATION_FORM, values)?;
    Ok(Consultation {
        record_id,
        patient_name: values.trimmed("patientName"),
        doctor_address: address(values, "doctorAddress")?,
        gender: values.trimmed("gender"),
        diagnosis: values.trimmed("diagnosis"),
        prescription: values.trimmed("prescription"),
        email: values.trimmed("email"),
    })
}

/// Check a diagnostic report form and its attachment before uploading.
pub fn validate_diagnostic_report(values: &FormValues, file: &[u8]) -> FieldErrors {
    let mut errors = DIAGNOSTIC_REPORT_FORM.validate(values);
    if file.is_empty() {
        errors.insert(FILE_FIELD, "File is required");
    }
    if errors.get("age").is_none() && values.trimmed("age").parse::<u32>().is_err() {
        errors.insert("age", "age must be a whole number");
    }
    for field in ["patientAddress", "diagnosticAddress"] {
        if errors.get(field).is_some() {
            continue;
        }
        if let Err(err) = AccountAddress::new(values.get(field)) {
            errors.insert(field, err.to_string());
        }
    }
    errors
}

/// Build a diagnostic report once the attachment has been stored.
pub fn parse_diagnostic_report(
    values: &FormValues,
    record_id: RecordId,
    report_hash: ContentHash,
) -> Result<DiagnosticReport, FieldErrors> {
    ensure_valid(&DIAGNOSTIC_REPORT_FORM, values)?;
    let age = values
        .trimmed("age")
        .parse::<u32>()
        .map_err(|_| single("age", "age must be a whole number"))?;
    Ok(DiagnosticReport {
        record_id,
        doctor_name: values.trimmed("doctorName"),
        patient_name: values.trimmed("patientName"),
        age,
        gender: values.trimmed("gender"),
        blood_group: values.trimmed("bg"),
        diagnostic_address: address(values, "diagnosticAddress")?,
        patient_address: address(values, "patientAddress")?,
        report_hash,
    })
}
