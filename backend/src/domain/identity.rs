//! Identity primitives: HH numbers, wallet addresses, networks, and roles.
//!
//! Everything here is a transient projection of state owned by the external
//! contracts. Constructors validate shape only; existence and uniqueness are
//! the contracts' business.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors returned by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    EmptyHhNumber,
    InvalidHhNumber,
    EmptyAddress,
    InvalidAddress,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHhNumber => write!(f, "HH Number is required"),
            Self::InvalidHhNumber => write!(f, "HH Number must be 6 digits"),
            Self::EmptyAddress => write!(f, "Wallet address is required"),
            Self::InvalidAddress => write!(
                f,
                "Wallet address must be 0x followed by 40 hexadecimal digits"
            ),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

static HH_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn hh_number_regex() -> &'static Regex {
    HH_NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{6}$")
            .unwrap_or_else(|error| panic!("HH number regex failed to compile: {error}"))
    })
}

pub(crate) fn address_regex() -> &'static Regex {
    ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^0x[0-9a-fA-F]{40}$")
            .unwrap_or_else(|error| panic!("address regex failed to compile: {error}"))
    })
}

/// Six-digit identifier used as the primary lookup key for every actor.
///
/// # Examples
/// ```
/// use ehr_backend::domain::HhNumber;
///
/// assert!(HhNumber::new("123456").is_ok());
/// assert!(HhNumber::new("12a456").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HhNumber(String);

impl HhNumber {
    /// Validate and construct an [`HhNumber`].
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdentityValidationError::EmptyHhNumber);
        }
        if !hh_number_regex().is_match(&raw) {
            return Err(IdentityValidationError::InvalidHhNumber);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for HhNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for HhNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<HhNumber> for String {
    fn from(value: HhNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for HhNumber {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Externally-owned chain account address (`0x` + 40 hex digits).
///
/// Comparison is case-insensitive; the original casing is kept for display
/// because checksummed addresses encode information in it.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Validate and construct an [`AccountAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyAddress);
        }
        if !address_regex().is_match(trimmed) {
            return Err(IdentityValidationError::InvalidAddress);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl PartialEq for AccountAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::hash::Hash for AccountAddress {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl AsRef<str> for AccountAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AccountAddress> for String {
    fn from(value: AccountAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Chain network identifier reported by the wallet (e.g. `11155111` for Sepolia).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(u64);

impl NetworkId {
    /// Sepolia test network.
    pub const SEPOLIA: Self = Self(11_155_111);

    /// Wrap a raw network id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Actor kind, implied by which registration contract an identity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Doctor,
    Diagnostic,
}

impl Role {
    /// Noun used in user-facing messages ("Patient already exists").
    pub fn label(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Diagnostic => "Diagnostic",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
