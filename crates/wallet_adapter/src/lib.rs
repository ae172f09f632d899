use anyhow::anyhow;
use async_trait::async_trait;
use shared::{
    domain::{NetworkId, TransactionId, WalletDescriptor},
    protocol::TransactionPayload,
};

mod simulated;
pub use simulated::{SimulatedWallet, WalletCall};

/// Optional adapter methods. The core only calls what is reported present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletCapabilities {
    pub request_transaction: bool,
    pub transaction_status: bool,
}

impl WalletCapabilities {
    pub const FULL: Self = Self {
        request_transaction: true,
        transaction_status: true,
    };

    pub const CONNECT_ONLY: Self = Self {
        request_transaction: false,
        transaction_status: false,
    };
}

impl Default for WalletCapabilities {
    fn default() -> Self {
        Self::FULL
    }
}

#[async_trait]
pub trait WalletAdapter: Send + Sync {
    async fn list_wallets(&self) -> anyhow::Result<Vec<WalletDescriptor>>;

    /// Rebuilds the wallet session against `network`. Runs whenever the
    /// shared network context changes, before any `select`.
    async fn bind_network(&self, network: NetworkId) -> anyhow::Result<()>;

    async fn select(&self, wallet_name: &str) -> anyhow::Result<()>;

    /// Returns the connected account's public key.
    async fn connect(&self) -> anyhow::Result<String>;

    async fn disconnect(&self) -> anyhow::Result<()>;

    fn capabilities(&self) -> WalletCapabilities {
        WalletCapabilities::default()
    }

    async fn request_transaction(
        &self,
        _payload: &TransactionPayload,
    ) -> anyhow::Result<TransactionId> {
        Err(anyhow!("request_transaction is not supported by this wallet"))
    }

    async fn transaction_status(&self, _id: &TransactionId) -> anyhow::Result<String> {
        Err(anyhow!("transaction_status is not supported by this wallet"))
    }
}
