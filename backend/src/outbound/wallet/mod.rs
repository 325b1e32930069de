//! Wallet provider with a fixed account list and network.
//!
//! Stands in for a browser-injected wallet when the portal workflows run
//! headless (local runs and integration tests).

use async_trait::async_trait;

use crate::domain::ports::{WalletProvider, WalletProviderError};
use crate::domain::{AccountAddress, NetworkId};

/// Wallet that always exposes the same accounts.
#[derive(Debug, Clone)]
pub struct StaticWalletProvider {
    network_id: NetworkId,
    accounts: Vec<AccountAddress>,
    declines: bool,
}

impl StaticWalletProvider {
    pub fn new(network_id: NetworkId, accounts: Vec<AccountAddress>) -> Self {
        Self {
            network_id,
            accounts,
            declines: false,
        }
    }

    /// A wallet whose holder declines every connection prompt.
    pub fn declining(network_id: NetworkId) -> Self {
        Self {
            network_id,
            accounts: Vec::new(),
            declines: true,
        }
    }
}

#[async_trait]
impl WalletProvider for StaticWalletProvider {
    async fn enable(&self) -> Result<Vec<AccountAddress>, WalletProviderError> {
        if self.declines {
            return Err(WalletProviderError::declined("User rejected the request."));
        }
        Ok(self.accounts.clone())
    }

    async fn network_id(&self) -> Result<NetworkId, WalletProviderError> {
        Ok(self.network_id)
    }

    async fn accounts(&self) -> Result<Vec<AccountAddress>, WalletProviderError> {
        if self.declines {
            return Ok(Vec::new());
        }
        Ok(self.accounts.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, SessionResolver};

    const ACCOUNT: &str = "0xb49bbaC7E687a50DCbb2d92341b4184B22ccA6fd";

    #[tokio::test]
    async fn resolves_first_account_and_network() {
        let account = AccountAddress::new(ACCOUNT).expect("address");
        let wallet = StaticWalletProvider::new(NetworkId::SEPOLIA, vec![account.clone()]);
        let session = SessionResolver
            .resolve(Some(&wallet))
            .await
            .expect("session");
        assert_eq!(session.account, account);
        assert_eq!(session.network_id, NetworkId::SEPOLIA);
    }

    #[tokio::test]
    async fn declining_wallet_denies_access() {
        let wallet = StaticWalletProvider::declining(NetworkId::SEPOLIA);
        let err = SessionResolver
            .resolve(Some(&wallet))
            .await
            .expect_err("declined");
        assert_eq!(err.code(), ErrorCode::AccountAccessDenied);
        assert_eq!(err.message(), "User denied access to accounts.");
    }
}
