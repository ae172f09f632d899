//! Build → submit → poll for public transfers on the connected session.
//!
//! The controller keeps at most one [`TransferRecord`]. Every submission
//! replaces it with a fresh attempt, and completions are matched back by
//! attempt id so a late result can never overwrite a newer record. A record
//! belongs to the session it was created in; once that session closes the
//! record is dropped.

use std::sync::Arc;

use shared::{
    domain::{
        AttemptId, ConnectionSession, SessionId, TransactionId, TransferRecord, TransferRequest,
        TransferStatus,
    },
    error::{ErrorKind, WalletError},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    amount::format_credits, builder::build_transfer, connection::ConnectionController,
    context::NetworkContext, events::WalletEvent,
};

pub struct TransferController {
    connection: Arc<ConnectionController>,
    context: NetworkContext,
    finalized_statuses: Vec<String>,
    inner: Mutex<TransferSlot>,
    events: broadcast::Sender<WalletEvent>,
}

#[derive(Default)]
struct TransferSlot {
    session_id: Option<SessionId>,
    record: Option<TransferRecord>,
    /// Attempt whose status lookup is currently awaiting the wallet.
    status_check: Option<AttemptId>,
}

impl TransferSlot {
    fn sync_session(&mut self, session: Option<&ConnectionSession>) {
        let current = session.map(|session| session.session_id);
        if self.session_id == current {
            return;
        }
        if let Some(record) = self.record.take() {
            debug!(attempt = ?record.attempt, status = ?record.status, "discarding transfer from closed session");
        }
        self.session_id = current;
        self.status_check = None;
    }
}

impl TransferController {
    pub fn new(
        connection: Arc<ConnectionController>,
        context: NetworkContext,
        events: broadcast::Sender<WalletEvent>,
        finalized_statuses: Vec<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            connection,
            context,
            finalized_statuses,
            inner: Mutex::new(TransferSlot::default()),
            events,
        })
    }

    pub async fn record(&self) -> Option<TransferRecord> {
        let mut slot = self.inner.lock().await;
        slot.sync_session(self.connection.session().as_ref());
        slot.record.clone()
    }

    pub async fn status(&self) -> TransferStatus {
        self.record()
            .await
            .map(|record| record.status)
            .unwrap_or(TransferStatus::Idle)
    }

    pub async fn submit(&self, request: &TransferRequest) -> Result<TransactionId, WalletError> {
        let session = self
            .connection
            .session()
            .ok_or_else(|| WalletError::generic(ErrorKind::NotConnected))?;
        if self.context.current() != session.network {
            return Err(WalletError::new(
                ErrorKind::InvalidState,
                "Network context differs from the connected session",
            ));
        }

        let (attempt, payload) = {
            let mut slot = self.inner.lock().await;
            slot.sync_session(Some(&session));

            let busy = slot.status_check.is_some()
                || slot
                    .record
                    .as_ref()
                    .is_some_and(|record| record.status.is_in_flight());
            if busy {
                return Err(WalletError::generic(ErrorKind::TransferInProgress));
            }

            let mut record = TransferRecord::begin(session.network);
            let attempt = record.attempt;

            if !self.connection.adapter().capabilities().request_transaction {
                let error = WalletError::generic(ErrorKind::Unsupported);
                record.fail(error.clone());
                self.store(&mut slot, record);
                return Err(error);
            }

            self.store(&mut slot, record.clone());
            let payload = match build_transfer(request, session.network) {
                Ok(payload) => payload,
                Err(error) => {
                    debug!(kind = ?error.kind, "transfer rejected locally");
                    record.fail(error.clone());
                    self.store(&mut slot, record);
                    return Err(error);
                }
            };

            record.fee_estimate = Some(payload.fee_estimate);
            record.transition(TransferStatus::Submitting);
            self.store(&mut slot, record);
            (attempt, payload.with_sender(session.public_key.clone()))
        };

        let fee = format_credits(payload.fee_estimate);
        info!(
            network = %payload.network,
            amount = %request.human_amount,
            %fee,
            "requesting transfer approval from wallet"
        );
        let outcome = self.connection.adapter().request_transaction(&payload).await;

        let mut slot = self.inner.lock().await;
        slot.sync_session(self.connection.session().as_ref());
        let Some(mut record) = slot
            .record
            .clone()
            .filter(|record| record.attempt == attempt)
        else {
            warn!(?attempt, "wallet session closed before the transfer request completed");
            return Err(WalletError::new(
                ErrorKind::NotConnected,
                "Wallet session ended before the transaction request completed",
            ));
        };

        match outcome {
            Ok(id) => {
                info!(transaction = %id, "transfer submitted");
                record.id = Some(id.clone());
                record.transition(TransferStatus::Submitted);
                self.store(&mut slot, record);
                Ok(id)
            }
            Err(err) => {
                let error = WalletError::from_adapter(ErrorKind::SubmissionRejected, err);
                warn!(reason = %error.message, "transfer submission rejected");
                record.fail(error.clone());
                self.store(&mut slot, record);
                Err(error)
            }
        }
    }

    /// Asks the wallet for the current status of the submitted transaction
    /// and returns the raw status string it reported.
    pub async fn refresh_status(&self) -> Result<String, WalletError> {
        let session = self
            .connection
            .session()
            .ok_or_else(|| WalletError::generic(ErrorKind::NotConnected))?;

        let (attempt, id, previous_status) = {
            let mut slot = self.inner.lock().await;
            slot.sync_session(Some(&session));
            if slot.status_check.is_some() {
                return Err(WalletError::generic(ErrorKind::TransferInProgress));
            }

            let Some(mut record) = slot.record.clone() else {
                return Err(WalletError::generic(ErrorKind::NoPendingTransfer));
            };
            let Some(id) = record.id.clone().filter(|_| record.status.accepts_status_check())
            else {
                return Err(WalletError::generic(ErrorKind::NoPendingTransfer));
            };
            if !self.connection.adapter().capabilities().transaction_status {
                return Err(WalletError::new(
                    ErrorKind::Unsupported,
                    "Status lookup not supported by this wallet",
                ));
            }

            let previous_status = record.status;
            record.transition(TransferStatus::Polling);
            let attempt = record.attempt;
            slot.status_check = Some(attempt);
            self.store(&mut slot, record);
            (attempt, id, previous_status)
        };

        let outcome = self.connection.adapter().transaction_status(&id).await;

        let mut slot = self.inner.lock().await;
        let current = self.connection.session();
        slot.sync_session(current.as_ref());
        if slot.status_check == Some(attempt) {
            slot.status_check = None;
        }
        let Some(mut record) = slot
            .record
            .clone()
            .filter(|record| record.attempt == attempt)
        else {
            if current.is_some_and(|current| current.session_id == session.session_id) {
                return Err(WalletError::new(
                    ErrorKind::InvalidState,
                    "Transfer was replaced before the status check completed",
                ));
            }
            debug!(?attempt, "wallet session closed before the status check completed");
            return Err(WalletError::new(
                ErrorKind::NotConnected,
                "Wallet session ended before the status check completed",
            ));
        };

        match outcome {
            Ok(raw) => {
                let next = if self.is_finalized(&raw) {
                    TransferStatus::Finalized
                } else {
                    TransferStatus::Polling
                };
                debug!(transaction = %id, status = %raw, "transfer status refreshed");
                record.reported_status = Some(raw.clone());
                record.error = None;
                record.transition(next);
                self.store(&mut slot, record);
                Ok(raw)
            }
            Err(err) => {
                let error = WalletError::new(
                    ErrorKind::StatusCheckFailed,
                    format!("Status check failed: {err}"),
                );
                warn!(transaction = %id, "{}", error.message);
                record.error = Some(error.clone());
                record.transition(previous_status);
                self.store(&mut slot, record);
                Err(error)
            }
        }
    }

    fn is_finalized(&self, raw: &str) -> bool {
        let raw = raw.trim();
        self.finalized_statuses
            .iter()
            .any(|status| status.eq_ignore_ascii_case(raw))
    }

    fn store(&self, slot: &mut TransferSlot, record: TransferRecord) {
        let _ = self.events.send(WalletEvent::TransferUpdated(record.clone()));
        slot.record = Some(record);
    }
}

#[cfg(test)]
#[path = "tests/transfer_tests.rs"]
mod tests;
