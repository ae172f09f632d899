use std::sync::Arc;

use tokio::{sync::broadcast, task::JoinHandle};
use wallet_adapter::WalletAdapter;

pub mod address;
pub mod amount;
pub mod builder;
pub mod config;
pub mod connection;
pub mod context;
pub mod events;
pub mod transfer;

pub use config::{load_settings, ClientSettings};
pub use connection::ConnectionController;
pub use context::{spawn_network_binding, NetworkCommit, NetworkContext, NetworkDependent};
pub use events::WalletEvent;
pub use transfer::TransferController;

/// Wires the network context, both controllers and the adapter rebinding
/// task around a single wallet adapter.
pub struct WalletClient {
    context: NetworkContext,
    connection: Arc<ConnectionController>,
    transfers: Arc<TransferController>,
    events: broadcast::Sender<WalletEvent>,
    binding_task: JoinHandle<()>,
}

impl WalletClient {
    /// Must be called from within a tokio runtime.
    pub fn start(adapter: Arc<dyn WalletAdapter>, settings: &ClientSettings) -> Self {
        let (events, _) = broadcast::channel(settings.event_buffer.max(1));
        let context = NetworkContext::new(settings.default_network);
        let binding_task = spawn_network_binding(&context, Arc::clone(&adapter));

        let connection = ConnectionController::new(
            adapter,
            context.clone(),
            events.clone(),
            settings.network_rebind_timeout(),
        );
        let transfers = TransferController::new(
            Arc::clone(&connection),
            context.clone(),
            events.clone(),
            settings.finalized_statuses.clone(),
        );

        Self {
            context,
            connection,
            transfers,
            events,
            binding_task,
        }
    }

    pub fn context(&self) -> &NetworkContext {
        &self.context
    }

    pub fn connection(&self) -> &Arc<ConnectionController> {
        &self.connection
    }

    pub fn transfers(&self) -> &Arc<TransferController> {
        &self.transfers
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

impl Drop for WalletClient {
    fn drop(&mut self) {
        self.binding_task.abort();
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
