//! In-process wallet used by the demo binary and integration tests.

use std::collections::VecDeque;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use shared::{
    domain::{NetworkId, TransactionId, WalletDescriptor},
    protocol::TransactionPayload,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{WalletAdapter, WalletCapabilities};

const DEFAULT_WALLET_NAME: &str = "Leo Wallet";
const DEFAULT_STATUS: &str = "Pending";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletCall {
    ListWallets,
    BindNetwork(NetworkId),
    Select(String),
    Connect,
    Disconnect,
    RequestTransaction(TransactionPayload),
    TransactionStatus(TransactionId),
}

pub struct SimulatedWallet {
    capabilities: WalletCapabilities,
    inner: Mutex<SimulatedState>,
}

struct SimulatedState {
    wallets: Vec<WalletDescriptor>,
    public_key: String,
    bound_network: Option<NetworkId>,
    selected: Option<String>,
    connected: bool,
    connect_error: Option<String>,
    disconnect_error: Option<String>,
    transaction_error: Option<String>,
    status_error: Option<String>,
    statuses: VecDeque<String>,
    last_status: String,
    issued_transactions: u64,
    calls: Vec<WalletCall>,
}

impl SimulatedWallet {
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            capabilities: WalletCapabilities::FULL,
            inner: Mutex::new(SimulatedState {
                wallets: vec![WalletDescriptor::new(DEFAULT_WALLET_NAME, true)],
                public_key: public_key.into(),
                bound_network: None,
                selected: None,
                connected: false,
                connect_error: None,
                disconnect_error: None,
                transaction_error: None,
                status_error: None,
                statuses: VecDeque::new(),
                last_status: DEFAULT_STATUS.to_string(),
                issued_transactions: 0,
                calls: Vec::new(),
            }),
        }
    }

    pub fn with_wallets(mut self, wallets: Vec<WalletDescriptor>) -> Self {
        self.inner.get_mut().wallets = wallets;
        self
    }

    pub fn with_capabilities(mut self, capabilities: WalletCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Statuses returned by successive status lookups; the last one repeats.
    pub fn with_status_sequence<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.get_mut().statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn failing_connect(mut self, message: impl Into<String>) -> Self {
        self.inner.get_mut().connect_error = Some(message.into());
        self
    }

    pub fn failing_disconnect(mut self, message: impl Into<String>) -> Self {
        self.inner.get_mut().disconnect_error = Some(message.into());
        self
    }

    pub fn rejecting_transactions(mut self, message: impl Into<String>) -> Self {
        self.inner.get_mut().transaction_error = Some(message.into());
        self
    }

    pub fn failing_status(mut self, message: impl Into<String>) -> Self {
        self.inner.get_mut().status_error = Some(message.into());
        self
    }

    pub async fn calls(&self) -> Vec<WalletCall> {
        self.inner.lock().await.calls.clone()
    }

    pub async fn bound_network(&self) -> Option<NetworkId> {
        self.inner.lock().await.bound_network
    }

    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.connected
    }
}

#[async_trait]
impl WalletAdapter for SimulatedWallet {
    async fn list_wallets(&self) -> anyhow::Result<Vec<WalletDescriptor>> {
        let mut state = self.inner.lock().await;
        state.calls.push(WalletCall::ListWallets);
        Ok(state.wallets.clone())
    }

    async fn bind_network(&self, network: NetworkId) -> anyhow::Result<()> {
        let mut state = self.inner.lock().await;
        state.calls.push(WalletCall::BindNetwork(network));
        if state.bound_network != Some(network) {
            // A rebuilt session forgets any previous selection.
            state.selected = None;
            state.connected = false;
        }
        state.bound_network = Some(network);
        debug!(%network, "simulated wallet: session rebuilt");
        Ok(())
    }

    async fn select(&self, wallet_name: &str) -> anyhow::Result<()> {
        let mut state = self.inner.lock().await;
        state.calls.push(WalletCall::Select(wallet_name.to_string()));
        if !state.wallets.iter().any(|wallet| wallet.name == wallet_name) {
            bail!("wallet '{wallet_name}' is not available");
        }
        state.selected = Some(wallet_name.to_string());
        Ok(())
    }

    async fn connect(&self) -> anyhow::Result<String> {
        let mut state = self.inner.lock().await;
        state.calls.push(WalletCall::Connect);
        if state.selected.is_none() {
            bail!("wallet not selected");
        }
        if state.bound_network.is_none() {
            bail!("wallet session has no network");
        }
        if let Some(message) = &state.connect_error {
            return Err(anyhow!(message.clone()));
        }
        state.connected = true;
        Ok(state.public_key.clone())
    }

    async fn disconnect(&self) -> anyhow::Result<()> {
        let mut state = self.inner.lock().await;
        state.calls.push(WalletCall::Disconnect);
        state.connected = false;
        state.selected = None;
        match &state.disconnect_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }

    fn capabilities(&self) -> WalletCapabilities {
        self.capabilities
    }

    async fn request_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> anyhow::Result<TransactionId> {
        let mut state = self.inner.lock().await;
        state
            .calls
            .push(WalletCall::RequestTransaction(payload.clone()));
        if !state.connected {
            bail!("wallet not connected");
        }
        if state.bound_network != Some(payload.network) {
            bail!(
                "transaction targets {} but the wallet is on {:?}",
                payload.network,
                state.bound_network
            );
        }
        if let Some(message) = &state.transaction_error {
            return Err(anyhow!(message.clone()));
        }
        state.issued_transactions += 1;
        Ok(TransactionId(format!(
            "at1sim{:058}",
            state.issued_transactions
        )))
    }

    async fn transaction_status(&self, id: &TransactionId) -> anyhow::Result<String> {
        let mut state = self.inner.lock().await;
        state.calls.push(WalletCall::TransactionStatus(id.clone()));
        if let Some(message) = &state.status_error {
            return Err(anyhow!(message.clone()));
        }
        if let Some(next) = state.statuses.pop_front() {
            state.last_status = next;
        }
        Ok(state.last_status.clone())
    }
}

#[cfg(test)]
#[path = "tests/simulated_tests.rs"]
mod tests;
