//! Instrumented wallet adapter shared by the controller tests.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{NetworkId, TransactionId, WalletDescriptor},
    protocol::TransactionPayload,
};
use tokio::sync::{broadcast, Mutex, Notify};
use wallet_adapter::{WalletAdapter, WalletCapabilities};

use crate::{
    context::{spawn_network_binding, NetworkContext},
    events::WalletEvent,
    ConnectionController, TransferController,
};

pub(crate) const PUBLIC_KEY: &str =
    "aleo1sender000000000000000000000000000000000000000000000000000000";

pub(crate) fn recipient() -> String {
    format!("aleo1{}", "r".repeat(58))
}

pub(crate) struct RecordingWallet {
    pub context: NetworkContext,
    pub journal: Arc<Mutex<Vec<String>>>,
    pub submitted: Arc<Mutex<Vec<TransactionPayload>>>,
    pub wallets: Vec<WalletDescriptor>,
    pub capabilities: WalletCapabilities,
    pub bind_delay: Option<Duration>,
    pub bind_error: Option<String>,
    pub connect_error: Option<String>,
    pub disconnect_error: Option<String>,
    pub transaction_error: Option<String>,
    pub status_error: Option<String>,
    pub status: String,
    pub transaction_gate: Option<Arc<Notify>>,
    pub status_gate: Option<Arc<Notify>>,
    issued: AtomicU64,
}

impl RecordingWallet {
    pub fn new(context: &NetworkContext) -> Self {
        Self {
            context: context.clone(),
            journal: Arc::new(Mutex::new(Vec::new())),
            submitted: Arc::new(Mutex::new(Vec::new())),
            wallets: vec![
                WalletDescriptor::new("Puzzle Wallet", false),
                WalletDescriptor::new("Leo Wallet", true),
            ],
            capabilities: WalletCapabilities::FULL,
            bind_delay: None,
            bind_error: None,
            connect_error: None,
            disconnect_error: None,
            transaction_error: None,
            status_error: None,
            status: "Pending".to_string(),
            transaction_gate: None,
            status_gate: None,
            issued: AtomicU64::new(0),
        }
    }

    pub async fn journal(&self) -> Vec<String> {
        self.journal.lock().await.clone()
    }

    async fn record(&self, entry: impl Into<String>) {
        self.journal.lock().await.push(entry.into());
    }
}

#[async_trait]
impl WalletAdapter for RecordingWallet {
    async fn list_wallets(&self) -> Result<Vec<WalletDescriptor>> {
        self.record("list_wallets").await;
        Ok(self.wallets.clone())
    }

    async fn bind_network(&self, network: NetworkId) -> Result<()> {
        if let Some(delay) = self.bind_delay {
            tokio::time::sleep(delay).await;
        }
        self.record(format!("bind_network:{network}")).await;
        if let Some(err) = &self.bind_error {
            return Err(anyhow!(err.clone()));
        }
        Ok(())
    }

    async fn select(&self, wallet_name: &str) -> Result<()> {
        // Captures what the shared context says at the moment of selection.
        let network = self.context.current();
        self.record(format!("select:{wallet_name}@{network}")).await;
        Ok(())
    }

    async fn connect(&self) -> Result<String> {
        self.record("connect").await;
        if let Some(err) = &self.connect_error {
            return Err(anyhow!(err.clone()));
        }
        Ok(PUBLIC_KEY.to_string())
    }

    async fn disconnect(&self) -> Result<()> {
        self.record("disconnect").await;
        if let Some(err) = &self.disconnect_error {
            return Err(anyhow!(err.clone()));
        }
        Ok(())
    }

    fn capabilities(&self) -> WalletCapabilities {
        self.capabilities
    }

    async fn request_transaction(&self, payload: &TransactionPayload) -> Result<TransactionId> {
        self.record("request_transaction").await;
        self.submitted.lock().await.push(payload.clone());
        if let Some(gate) = &self.transaction_gate {
            gate.notified().await;
        }
        if let Some(err) = &self.transaction_error {
            return Err(anyhow!(err.clone()));
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TransactionId(format!("at1tx{n}")))
    }

    async fn transaction_status(&self, id: &TransactionId) -> Result<String> {
        self.record(format!("transaction_status:{id}")).await;
        if let Some(gate) = &self.status_gate {
            gate.notified().await;
        }
        if let Some(err) = &self.status_error {
            return Err(anyhow!(err.clone()));
        }
        Ok(self.status.clone())
    }
}

pub(crate) struct Harness {
    pub wallet: Arc<RecordingWallet>,
    pub context: NetworkContext,
    pub connection: Arc<ConnectionController>,
    pub transfers: Arc<TransferController>,
    pub events: broadcast::Sender<WalletEvent>,
}

pub(crate) fn harness(configure: impl FnOnce(&mut RecordingWallet)) -> Harness {
    harness_with(Duration::from_secs(2), Vec::new(), configure)
}

pub(crate) fn harness_with(
    rebind_timeout: Duration,
    finalized_statuses: Vec<String>,
    configure: impl FnOnce(&mut RecordingWallet),
) -> Harness {
    let context = NetworkContext::new(NetworkId::Mainnet);
    let mut wallet = RecordingWallet::new(&context);
    configure(&mut wallet);
    let wallet = Arc::new(wallet);

    let (events, _) = broadcast::channel(64);
    let adapter: Arc<dyn WalletAdapter> = wallet.clone();
    // Aborted with the runtime at the end of each test.
    let _binding = spawn_network_binding(&context, Arc::clone(&adapter));
    let connection =
        ConnectionController::new(adapter, context.clone(), events.clone(), rebind_timeout);
    let transfers = TransferController::new(
        Arc::clone(&connection),
        context.clone(),
        events.clone(),
        finalized_statuses,
    );

    Harness {
        wallet,
        context,
        connection,
        transfers,
        events,
    }
}

impl Harness {
    pub async fn connect(&self, network: NetworkId) {
        self.connection.open_network_picker().await;
        self.connection
            .choose_network(network)
            .await
            .expect("choose network");
        self.connection.confirm_connect().await.expect("connect");
    }
}
