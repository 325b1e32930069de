//! Shared call/send context and error type for contract capability ports.

use crate::domain::AccountAddress;

use super::define_port_error;

/// Read-only invocation against a deployed contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Deployed address for the session's network.
    pub contract: AccountAddress,
}

/// State-changing invocation signed by `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendContext {
    pub contract: AccountAddress,
    /// Account that signs and pays for the transaction.
    pub from: AccountAddress,
}

define_port_error! {
    /// Failures reported by a contract provider.
    pub enum ContractCallError {
        /// The signer declined or the provider refused the request.
        Rejected { message: String } => "contract request rejected: {message}",
        /// The contract executed and reverted.
        Reverted { message: String } => "contract reverted: {message}",
        /// The provider could not be reached.
        Transport { message: String } => "contract transport failed: {message}",
    }
}

impl ContractCallError {
    /// Provider message without the variant prefix.
    pub fn provider_message(&self) -> &str {
        match self {
            Self::Rejected { message }
            | Self::Reverted { message }
            | Self::Transport { message } => message,
        }
    }
}
