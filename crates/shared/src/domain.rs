use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WalletError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

id_newtype!(SessionId);
id_newtype!(AttemptId);

/// Transaction identifier handed back by the wallet after a successful request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkId {
    #[default]
    Mainnet,
    Testnet,
}

impl NetworkId {
    pub fn label(self) -> &'static str {
        match self {
            NetworkId::Mainnet => "Mainnet",
            NetworkId::Testnet => "Testnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for NetworkId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet_beta" | "mainnetbeta" => Ok(NetworkId::Mainnet),
            "testnet" | "testnet_beta" | "testnetbeta" => Ok(NetworkId::Testnet),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDescriptor {
    pub name: String,
    pub installed: bool,
}

impl WalletDescriptor {
    pub fn new(name: impl Into<String>, installed: bool) -> Self {
        Self {
            name: name.into(),
            installed,
        }
    }
}

/// Picks the wallet to connect: the first installed one, otherwise the first listed.
pub fn preferred_wallet(wallets: &[WalletDescriptor]) -> Option<&WalletDescriptor> {
    wallets
        .iter()
        .find(|wallet| wallet.installed)
        .or_else(|| wallets.first())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    NetworkSelecting,
    WalletSelecting,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSession {
    pub session_id: SessionId,
    pub network: NetworkId,
    pub wallet_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    pub human_amount: String,
}

impl TransferRequest {
    pub fn new(recipient: impl Into<String>, human_amount: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            human_amount: human_amount.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Idle,
    Validating,
    Submitting,
    Submitted,
    Polling,
    Finalized,
    Failed,
}

impl TransferStatus {
    /// Validating and Submitting hold the single submission slot.
    ///
    /// Submitted and Polling records are deliberately replaceable between
    /// refreshes so a new transfer can start while an earlier one is still
    /// unconfirmed; an in-progress status lookup is gated separately.
    pub fn is_in_flight(self) -> bool {
        matches!(self, TransferStatus::Validating | TransferStatus::Submitting)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransferStatus::Finalized | TransferStatus::Failed)
    }

    pub fn accepts_status_check(self) -> bool {
        matches!(self, TransferStatus::Submitted | TransferStatus::Polling)
    }
}

/// One submission attempt. A new submission replaces the record instead of mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub attempt: AttemptId,
    pub network: NetworkId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TransactionId>,
    pub status: TransferStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_estimate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WalletError>,
    pub updated_at: DateTime<Utc>,
}

impl TransferRecord {
    pub fn begin(network: NetworkId) -> Self {
        Self {
            attempt: AttemptId::new(),
            network,
            id: None,
            status: TransferStatus::Validating,
            reported_status: None,
            fee_estimate: None,
            error: None,
            updated_at: Utc::now(),
        }
    }

    pub fn transition(&mut self, status: TransferStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, error: WalletError) {
        self.error = Some(error);
        self.transition(TransferStatus::Failed);
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
