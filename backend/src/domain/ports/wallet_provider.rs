//! Driven port for the externally injected wallet (account and network source).

use async_trait::async_trait;

use crate::domain::{AccountAddress, NetworkId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by wallet providers.
    pub enum WalletProviderError {
        /// The user declined the connection prompt.
        Declined { message: String } => "wallet connection declined: {message}",
        /// The provider failed to answer.
        Unavailable { message: String } => "wallet provider unavailable: {message}",
    }
}

/// Capability object supplied by the user's wallet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user to expose their accounts.
    async fn enable(&self) -> Result<Vec<AccountAddress>, WalletProviderError>;

    /// Network the wallet is connected to.
    async fn network_id(&self) -> Result<NetworkId, WalletProviderError>;

    /// Accounts already exposed, without prompting.
    async fn accounts(&self) -> Result<Vec<AccountAddress>, WalletProviderError>;
}
