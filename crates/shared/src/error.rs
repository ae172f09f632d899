use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRecipient,
    InvalidAmount,
    TransferInProgress,
    SubmissionRejected,
    ConnectionFailed,
    StatusCheckFailed,
    NotConnected,
    NoPendingTransfer,
    Unsupported,
    InvalidState,
}

impl ErrorKind {
    pub fn generic_message(self) -> &'static str {
        match self {
            ErrorKind::InvalidRecipient => {
                "Invalid recipient address. Must be an Aleo address (aleo1...)"
            }
            ErrorKind::InvalidAmount => "Invalid amount",
            ErrorKind::TransferInProgress => "A transfer is already in progress",
            ErrorKind::SubmissionRejected => "Transaction failed",
            ErrorKind::ConnectionFailed => "Wallet connection failed",
            ErrorKind::StatusCheckFailed => "Status check failed",
            ErrorKind::NotConnected => "Wallet not connected",
            ErrorKind::NoPendingTransfer => "No submitted transaction to check",
            ErrorKind::Unsupported => "Transaction not supported",
            ErrorKind::InvalidState => "Operation not allowed in the current state",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct WalletError {
    pub kind: ErrorKind,
    pub message: String,
}

impl WalletError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn generic(kind: ErrorKind) -> Self {
        Self::new(kind, kind.generic_message())
    }

    /// Keeps the adapter's own wording when it has any.
    pub fn from_adapter(kind: ErrorKind, err: impl fmt::Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::generic(kind)
        } else {
            Self::new(kind, message)
        }
    }
}

impl From<ErrorKind> for WalletError {
    fn from(kind: ErrorKind) -> Self {
        Self::generic(kind)
    }
}
