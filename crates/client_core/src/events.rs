//! Notifications published to the presentation layer.

use shared::{
    domain::{ConnectionSession, ConnectionState, SessionId, TransferRecord},
    error::WalletError,
};

#[derive(Debug, Clone)]
pub enum WalletEvent {
    ConnectionStateChanged(ConnectionState),
    PickerVisibilityChanged(bool),
    SessionOpened(ConnectionSession),
    SessionClosed { session_id: SessionId },
    ConnectFailed(WalletError),
    TransferUpdated(TransferRecord),
}
