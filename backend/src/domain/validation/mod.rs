//! Field-level and cross-field form validation.
//!
//! Validation is a pure function from [`FormValues`] to [`FieldErrors`]. It
//! runs synchronously before any network call and must be re-run on every
//! submit attempt; nothing here remembers a previous result.
//!
//! Each form is described by a static schema: an ordered list of fields,
//! each with a required-message and a chain of [`Check`]s. The first failing
//! check for a field wins, matching how the portal shows one message per
//! input.

mod forms;

pub use forms::{
    CONSULTATION_FORM, DIAGNOSTIC_REGISTRATION_FORM, DIAGNOSTIC_REPORT_FORM,
    DOCTOR_REGISTRATION_FORM, LOGIN_FORM, PATIENT_REGISTRATION_FORM, parse_consultation,
    parse_diagnostic_registration, parse_diagnostic_report, parse_doctor_number,
    parse_doctor_registration, parse_login, parse_patient_registration,
    validate_diagnostic_report,
};

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use super::Error;
use super::identity::{address_regex, hh_number_regex};

/// Minimum credential length accepted by registration forms.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Raw field values of a pending form, keyed by the portal's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    ///
    /// # Examples
    /// ```
    /// use ehr_backend::domain::validation::FormValues;
    ///
    /// let form = FormValues::new().with("hhNumber", "123456");
    /// assert_eq!(form.get("hhNumber"), "123456");
    /// assert_eq!(form.get("missing"), "");
    /// ```
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Replace a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Field value, or the empty string when the field was never set.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map_or("", String::as_str)
    }

    /// Field value with surrounding whitespace removed.
    pub(crate) fn trimmed(&self, field: &str) -> String {
        self.get(field).trim().to_owned()
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }
}

/// Mapping from field name to the message shown next to that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `true` when the form is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convert into a [`ErrorCode::ValidationFailed`](super::ErrorCode) error
    /// carrying the mapping under `details.fieldErrors`.
    pub fn into_error(self) -> Error {
        let details = json!({ "fieldErrors": self.0 });
        Error::validation_failed("one or more fields are invalid").with_details(details)
    }
}

/// A single rule applied to a field after the required check passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Six digits, nothing else.
    HhNumber { message: &'static str },
    /// Loose `local@domain.tld` shape.
    Email,
    /// `0x` followed by 40 hexadecimal digits.
    Address,
    /// At least `min` characters.
    MinLength { min: usize, message: &'static str },
    /// Must equal the value of another field.
    Matches { field: &'static str, message: &'static str },
}

/// How the presence of a value is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Blank after trimming counts as missing (text inputs).
    Trimmed,
    /// Only the empty string counts as missing (passwords, selects).
    Raw,
}

/// Declarative rule set for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub presence: Presence,
    pub required_message: &'static str,
    pub checks: &'static [Check],
}

/// Ordered field rules for one form.
#[derive(Debug, Clone, Copy)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

impl FormSchema {
    /// Run every rule against `values`.
    pub fn validate(&self, values: &FormValues) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for rule in self.fields {
            if let Some(message) = check_field(rule, values) {
                errors.insert(rule.name, message);
            }
        }
        errors
    }
}

fn check_field(rule: &FieldRule, values: &FormValues) -> Option<&'static str> {
    let value = values.get(rule.name);
    let missing = match rule.presence {
        Presence::Trimmed => value.trim().is_empty(),
        Presence::Raw => value.is_empty(),
    };
    if missing {
        return Some(rule.required_message);
    }
    rule.checks
        .iter()
        .find_map(|check| failed_check_message(*check, value, values))
}

fn failed_check_message(check: Check, value: &str, values: &FormValues) -> Option<&'static str> {
    let passes = match check {
        Check::HhNumber { .. } => hh_number_regex().is_match(value),
        Check::Email => is_email(value),
        Check::Address => address_regex().is_match(value.trim()),
        Check::MinLength { min, .. } => value.chars().count() >= min,
        Check::Matches { field, .. } => value == values.get(field),
    };
    if passes {
        return None;
    }
    Some(match check {
        Check::HhNumber { message }
        | Check::MinLength { message, .. }
        | Check::Matches { message, .. } => message,
        Check::Email => "Invalid email format",
        Check::Address => "Wallet address must be 0x followed by 40 hexadecimal digits",
    })
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn is_email(value: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
                .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
        })
        .is_match(value)
}
