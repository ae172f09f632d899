//! Network picker → wallet selection → connect/disconnect lifecycle.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use shared::{
    domain::{
        preferred_wallet, ConnectionSession, ConnectionState, NetworkId, SessionId,
        WalletDescriptor,
    },
    error::{ErrorKind, WalletError},
};
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};
use wallet_adapter::WalletAdapter;

use crate::{address::abbreviate_address, context::NetworkContext, events::WalletEvent};

pub struct ConnectionController {
    adapter: Arc<dyn WalletAdapter>,
    context: NetworkContext,
    rebind_timeout: Duration,
    inner: Mutex<ConnectionInner>,
    session: watch::Sender<Option<ConnectionSession>>,
    events: broadcast::Sender<WalletEvent>,
}

struct ConnectionInner {
    state: ConnectionState,
    tentative_network: NetworkId,
    picker_open: bool,
    selected_wallet: Option<WalletDescriptor>,
}

impl ConnectionController {
    pub fn new(
        adapter: Arc<dyn WalletAdapter>,
        context: NetworkContext,
        events: broadcast::Sender<WalletEvent>,
        rebind_timeout: Duration,
    ) -> Arc<Self> {
        let (session, _) = watch::channel(None);
        let tentative_network = context.current();
        Arc::new(Self {
            adapter,
            context,
            rebind_timeout,
            inner: Mutex::new(ConnectionInner {
                state: ConnectionState::Disconnected,
                tentative_network,
                picker_open: false,
                selected_wallet: None,
            }),
            session,
            events,
        })
    }

    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state
    }

    pub async fn is_picker_open(&self) -> bool {
        self.inner.lock().await.picker_open
    }

    pub async fn tentative_network(&self) -> NetworkId {
        self.inner.lock().await.tentative_network
    }

    pub async fn selected_wallet(&self) -> Option<WalletDescriptor> {
        self.inner.lock().await.selected_wallet.clone()
    }

    /// Network committed to the shared context.
    pub fn network(&self) -> NetworkId {
        self.context.current()
    }

    pub fn session(&self) -> Option<ConnectionSession> {
        self.session.borrow().clone()
    }

    pub(crate) fn adapter(&self) -> &Arc<dyn WalletAdapter> {
        &self.adapter
    }

    pub async fn open_network_picker(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state != ConnectionState::Disconnected {
            debug!(state = ?inner.state, "network picker already past disconnected; ignoring");
            return;
        }
        inner.tentative_network = self.context.current();
        inner.picker_open = true;
        self.transition(&mut inner, ConnectionState::NetworkSelecting);
        self.publish(WalletEvent::PickerVisibilityChanged(true));
    }

    /// Records the network to use on the next connect. The live session and
    /// the shared context are untouched until `confirm_connect`.
    pub async fn choose_network(&self, network: NetworkId) -> Result<(), WalletError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            ConnectionState::NetworkSelecting | ConnectionState::WalletSelecting => {}
            ConnectionState::Disconnected if inner.picker_open => {}
            ConnectionState::Disconnected => {
                return Err(WalletError::new(
                    ErrorKind::InvalidState,
                    "Open the network picker before choosing a network",
                ));
            }
            ConnectionState::Connecting | ConnectionState::Connected => {
                return Err(WalletError::new(
                    ErrorKind::InvalidState,
                    "Disconnect before switching networks",
                ));
            }
        }
        inner.tentative_network = network;
        self.transition(&mut inner, ConnectionState::WalletSelecting);
        Ok(())
    }

    pub async fn close_network_picker(&self) -> Result<(), WalletError> {
        let mut inner = self.inner.lock().await;
        if inner.state == ConnectionState::Connecting {
            return Err(WalletError::new(
                ErrorKind::InvalidState,
                "Connection attempt in progress",
            ));
        }
        if matches!(
            inner.state,
            ConnectionState::NetworkSelecting | ConnectionState::WalletSelecting
        ) {
            self.transition(&mut inner, ConnectionState::Disconnected);
        }
        if inner.picker_open {
            inner.picker_open = false;
            self.publish(WalletEvent::PickerVisibilityChanged(false));
        }
        Ok(())
    }

    pub async fn confirm_connect(&self) -> Result<ConnectionSession, WalletError> {
        let network = {
            let mut inner = self.inner.lock().await;
            let ready = inner.picker_open
                && matches!(
                    inner.state,
                    ConnectionState::NetworkSelecting
                        | ConnectionState::WalletSelecting
                        | ConnectionState::Disconnected
                );
            if !ready {
                return Err(WalletError::new(
                    ErrorKind::InvalidState,
                    format!("Cannot connect while {:?}", inner.state),
                ));
            }
            self.transition(&mut inner, ConnectionState::Connecting);
            inner.tentative_network
        };

        let wallets = match self.adapter.list_wallets().await {
            Ok(wallets) => wallets,
            Err(err) => return Err(self.fail_connect(err).await),
        };
        let Some(wallet) = preferred_wallet(&wallets).cloned() else {
            return Err(self.fail_connect("No wallet available").await);
        };
        self.inner.lock().await.selected_wallet = Some(wallet.clone());

        let commit = self.context.commit(network);
        match tokio::time::timeout(self.rebind_timeout, self.context.wait_applied(commit)).await {
            Ok(Ok(())) => debug!(%network, generation = commit.generation, "network context applied"),
            Ok(Err(reason)) => return Err(self.fail_connect(reason).await),
            Err(_) => {
                let reason = format!(
                    "Wallet did not switch to {network} within {}ms",
                    self.rebind_timeout.as_millis()
                );
                return Err(self.fail_connect(reason).await);
            }
        }

        if let Err(err) = self.adapter.select(&wallet.name).await {
            return Err(self.fail_connect(err).await);
        }
        let public_key = match self.adapter.connect().await {
            Ok(public_key) => public_key,
            Err(err) => return Err(self.fail_connect(err).await),
        };

        let session = ConnectionSession {
            session_id: SessionId::new(),
            network,
            wallet_name: wallet.name,
            public_key: Some(public_key).filter(|key| !key.is_empty()),
            connected_at: Utc::now(),
        };

        let account = session
            .public_key
            .as_deref()
            .map(abbreviate_address)
            .unwrap_or_default();

        let mut inner = self.inner.lock().await;
        self.session.send_replace(Some(session.clone()));
        self.transition(&mut inner, ConnectionState::Connected);
        inner.picker_open = false;
        info!(%network, wallet = %session.wallet_name, %account, "wallet connected");
        self.publish(WalletEvent::PickerVisibilityChanged(false));
        self.publish(WalletEvent::SessionOpened(session.clone()));
        Ok(session)
    }

    /// Local teardown happens first and always; the adapter call is best-effort.
    pub async fn disconnect(&self) -> Result<(), WalletError> {
        let closed = {
            let mut inner = self.inner.lock().await;
            if inner.state == ConnectionState::Connecting {
                return Err(WalletError::new(
                    ErrorKind::InvalidState,
                    "Connection attempt in progress",
                ));
            }
            let closed = self.session.send_replace(None);
            inner.selected_wallet = None;
            if inner.picker_open {
                inner.picker_open = false;
                self.publish(WalletEvent::PickerVisibilityChanged(false));
            }
            self.transition(&mut inner, ConnectionState::Disconnected);
            closed
        };

        if let Some(session) = &closed {
            info!(wallet = %session.wallet_name, network = %session.network, "wallet session closed");
            self.publish(WalletEvent::SessionClosed {
                session_id: session.session_id,
            });
        }

        if let Err(err) = self.adapter.disconnect().await {
            warn!("wallet disconnect failed; local session already cleared: {err}");
        }
        Ok(())
    }

    async fn fail_connect(&self, err: impl std::fmt::Display) -> WalletError {
        let error = WalletError::from_adapter(ErrorKind::ConnectionFailed, err);
        warn!(reason = %error.message, "wallet connect failed");

        let mut inner = self.inner.lock().await;
        self.session.send_replace(None);
        self.transition(&mut inner, ConnectionState::Disconnected);
        self.publish(WalletEvent::ConnectFailed(error.clone()));
        error
    }

    fn transition(&self, inner: &mut ConnectionInner, next: ConnectionState) {
        if inner.state == next {
            return;
        }
        debug!(from = ?inner.state, to = ?next, "connection state");
        inner.state = next;
        self.publish(WalletEvent::ConnectionStateChanged(next));
    }

    fn publish(&self, event: WalletEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/connection_tests.rs"]
mod tests;
