//! Session and identity resolution.
//!
//! A [`SessionContext`] is produced once per user action from the injected
//! wallet and threaded explicitly into every gateway call. Contract
//! addresses come from a static [`ContractAddressBook`] keyed by contract and
//! network.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error as ThisError;
use tracing::debug;

use super::ports::{WalletProvider, WalletProviderError};
use super::{AccountAddress, Error, IdentityValidationError, NetworkId};

/// Network and signing account in effect for one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub network_id: NetworkId,
    pub account: AccountAddress,
}

impl SessionContext {
    pub fn new(network_id: NetworkId, account: AccountAddress) -> Self {
        Self {
            network_id,
            account,
        }
    }
}

/// Resolves a [`SessionContext`] from an optional wallet provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionResolver;

impl SessionResolver {
    /// Prompt the wallet for access and read the active network.
    ///
    /// Failures surface once; nothing is retried.
    pub async fn resolve(
        &self,
        provider: Option<&dyn WalletProvider>,
    ) -> Result<SessionContext, Error> {
        let Some(provider) = provider else {
            return Err(Error::provider_unavailable(
                "Please install a wallet extension",
            ));
        };

        let accounts = provider.enable().await.map_err(map_wallet_error)?;
        let Some(account) = accounts.into_iter().next() else {
            return Err(Error::account_access_denied(
                "User denied access to accounts.",
            ));
        };
        let network_id = provider.network_id().await.map_err(map_wallet_error)?;
        debug!(%network_id, %account, "wallet session resolved");
        Ok(SessionContext::new(network_id, account))
    }
}

fn map_wallet_error(error: WalletProviderError) -> Error {
    match error {
        WalletProviderError::Declined { .. } => {
            Error::account_access_denied("User denied access to accounts.")
        }
        WalletProviderError::Unavailable { message } => Error::provider_unavailable(message),
    }
}

/// The six contracts the portal talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractKind {
    PatientRegistration,
    DoctorRegistration,
    DiagnosticRegistration,
    DoctorForm,
    DiagnosticForm,
    UploadEhr,
}

impl ContractKind {
    pub const ALL: [Self; 6] = [
        Self::PatientRegistration,
        Self::DoctorRegistration,
        Self::DiagnosticRegistration,
        Self::DoctorForm,
        Self::DiagnosticForm,
        Self::UploadEhr,
    ];

    /// Artefact name used by the contract build output.
    pub fn artifact_name(self) -> &'static str {
        match self {
            Self::PatientRegistration => "PatientRegistration",
            Self::DoctorRegistration => "DoctorRegistration",
            Self::DiagnosticRegistration => "DiagnosticRegistration",
            Self::DoctorForm => "DoctorForm",
            Self::DiagnosticForm => "DiagnosticForm",
            Self::UploadEhr => "UploadEhr",
        }
    }

    fn from_artifact_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.artifact_name() == name)
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.artifact_name())
    }
}

/// Errors raised while loading an address book.
#[derive(Debug, ThisError)]
pub enum AddressBookError {
    #[error("contract artefacts are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network id `{0}` is not a number")]
    NetworkId(String),
    #[error("{contract} on network {network}: {source}")]
    Address {
        contract: ContractKind,
        network: NetworkId,
        #[source]
        source: IdentityValidationError,
    },
}

#[derive(Debug, Deserialize)]
struct ArtifactDto {
    #[serde(default)]
    networks: BTreeMap<String, NetworkDeploymentDto>,
}

#[derive(Debug, Deserialize)]
struct NetworkDeploymentDto {
    address: String,
}

/// Static `(contract, network) -> address` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAddressBook {
    entries: BTreeMap<(ContractKind, NetworkId), AccountAddress>,
}

impl ContractAddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, kind: ContractKind, network: NetworkId, address: AccountAddress) -> Self {
        self.insert(kind, network, address);
        self
    }

    pub fn insert(&mut self, kind: ContractKind, network: NetworkId, address: AccountAddress) {
        self.entries.insert((kind, network), address);
    }

    /// Load deployments from a document shaped like contract build artefacts:
    /// `{"<Contract>": {"networks": {"<id>": {"address": "0x…"}}}}`.
    ///
    /// Unknown contract names are skipped.
    ///
    /// # Examples
    /// ```
    /// use ehr_backend::domain::{ContractAddressBook, ContractKind, NetworkId};
    ///
    /// let book = ContractAddressBook::from_artifacts_json(
    ///     r#"{"UploadEhr":{"networks":{"11155111":{"address":"0x5FbDB2315678afecb367f032d93F642f64180aa3"}}}}"#,
    /// )
    /// .expect("valid artefacts");
    /// assert!(book.address_for(ContractKind::UploadEhr, NetworkId::SEPOLIA).is_ok());
    /// assert!(book.address_for(ContractKind::DoctorForm, NetworkId::SEPOLIA).is_err());
    /// ```
    pub fn from_artifacts_json(raw: &str) -> Result<Self, AddressBookError> {
        let artifacts: BTreeMap<String, ArtifactDto> = serde_json::from_str(raw)?;
        let mut book = Self::new();
        for (name, artifact) in artifacts {
            let Some(kind) = ContractKind::from_artifact_name(&name) else {
                debug!(contract = %name, "skipping unknown contract artefact");
                continue;
            };
            for (network, deployment) in artifact.networks {
                let network = network
                    .parse::<u64>()
                    .map(NetworkId::new)
                    .map_err(|_| AddressBookError::NetworkId(network.clone()))?;
                let address = AccountAddress::new(deployment.address).map_err(|source| {
                    AddressBookError::Address {
                        contract: kind,
                        network,
                        source,
                    }
                })?;
                book.insert(kind, network, address);
            }
        }
        Ok(book)
    }

    /// Deployed address of `kind` on `network`.
    pub fn address_for(&self, kind: ContractKind, network: NetworkId) -> Result<AccountAddress, Error> {
        self.entries.get(&(kind, network)).cloned().ok_or_else(|| {
            Error::contract_not_deployed(format!(
                "{kind} contract is not deployed on network {network}"
            ))
        })
    }
}
