//! Shared network selection with an explicit "applied" barrier.
//!
//! Committing a network bumps a generation counter. Every registered
//! dependent (for example the task rebinding the wallet adapter) observes the
//! commit, rebuilds whatever it owns, and acknowledges it. Callers await
//! [`NetworkContext::wait_applied`] before touching anything that depends on
//! the rebuilt state.

use std::sync::Arc;

use shared::domain::NetworkId;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};
use wallet_adapter::WalletAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCommit {
    pub network: NetworkId,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct ContextState {
    network: NetworkId,
    generation: u64,
    dependents: usize,
    pending: usize,
    failure: Option<String>,
}

#[derive(Clone)]
pub struct NetworkContext {
    state: Arc<watch::Sender<ContextState>>,
}

impl NetworkContext {
    pub fn new(initial: NetworkId) -> Self {
        let (state, _) = watch::channel(ContextState {
            network: initial,
            generation: 0,
            dependents: 0,
            pending: 0,
            failure: None,
        });
        Self {
            state: Arc::new(state),
        }
    }

    pub fn current(&self) -> NetworkId {
        self.state.borrow().network
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn commit(&self, network: NetworkId) -> NetworkCommit {
        let mut commit = NetworkCommit {
            network,
            generation: 0,
        };
        self.state.send_modify(|state| {
            state.network = network;
            state.generation += 1;
            state.pending = state.dependents;
            state.failure = None;
            commit.generation = state.generation;
        });
        debug!(%network, generation = commit.generation, "network context committed");
        commit
    }

    /// Resolves once every dependent acknowledged `commit`. A dependent that
    /// failed to rebuild, or a newer commit, turns this into an error.
    pub async fn wait_applied(&self, commit: NetworkCommit) -> Result<(), String> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| state.generation != commit.generation || state.pending == 0)
            .await
            .map_err(|_| "network context closed".to_string())?
            .clone();

        if state.generation != commit.generation {
            return Err(format!(
                "network switch to {} was superseded by a newer selection",
                commit.network
            ));
        }
        match state.failure {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    pub fn register(&self) -> NetworkDependent {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.dependents += 1;
            generation = state.generation;
        });
        NetworkDependent {
            state: Arc::clone(&self.state),
            rx: self.state.subscribe(),
            seen: generation,
            acknowledged: generation,
        }
    }
}

pub struct NetworkDependent {
    state: Arc<watch::Sender<ContextState>>,
    rx: watch::Receiver<ContextState>,
    seen: u64,
    acknowledged: u64,
}

impl NetworkDependent {
    /// Waits for a commit newer than the last one observed.
    pub async fn next_commit(&mut self) -> Option<NetworkCommit> {
        let seen = self.seen;
        let commit = {
            let state = self.rx.wait_for(|state| state.generation > seen).await.ok()?;
            NetworkCommit {
                network: state.network,
                generation: state.generation,
            }
        };
        self.seen = commit.generation;
        Some(commit)
    }

    pub fn acknowledge(&mut self, commit: NetworkCommit) {
        self.settle(commit, None);
    }

    pub fn reject(&mut self, commit: NetworkCommit, reason: impl Into<String>) {
        self.settle(commit, Some(reason.into()));
    }

    fn settle(&mut self, commit: NetworkCommit, failure: Option<String>) {
        self.state.send_modify(|state| {
            if state.generation != commit.generation || state.pending == 0 {
                return;
            }
            state.pending -= 1;
            if failure.is_some() && state.failure.is_none() {
                state.failure = failure;
            }
        });
        self.acknowledged = commit.generation;
    }
}

impl Drop for NetworkDependent {
    fn drop(&mut self) {
        let acknowledged = self.acknowledged;
        self.state.send_modify(|state| {
            state.dependents = state.dependents.saturating_sub(1);
            if state.generation > acknowledged && state.pending > 0 {
                state.pending -= 1;
            }
        });
    }
}

/// Rebinds `adapter` on every committed network and acknowledges the commit
/// once the adapter's session has been rebuilt.
pub fn spawn_network_binding(
    context: &NetworkContext,
    adapter: Arc<dyn WalletAdapter>,
) -> JoinHandle<()> {
    let mut dependent = context.register();
    tokio::spawn(async move {
        while let Some(commit) = dependent.next_commit().await {
            match adapter.bind_network(commit.network).await {
                Ok(()) => dependent.acknowledge(commit),
                Err(err) => {
                    warn!(network = %commit.network, "wallet session rebuild failed: {err}");
                    dependent.reject(commit, err.to_string());
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod tests;
