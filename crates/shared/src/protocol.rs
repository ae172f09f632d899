use serde::{Deserialize, Serialize};

use crate::domain::NetworkId;

pub const CREDITS_PROGRAM_ID: &str = "credits.aleo";
pub const TRANSFER_PUBLIC_FUNCTION: &str = "transfer_public";

/// Request handed to the wallet for signing and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub program_id: String,
    pub function_name: String,
    pub arguments: Vec<String>,
    pub fee_estimate: u64,
    pub network: NetworkId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl TransactionPayload {
    pub fn transfer_public(
        recipient: &str,
        amount: u64,
        fee_estimate: u64,
        network: NetworkId,
    ) -> Self {
        Self {
            program_id: CREDITS_PROGRAM_ID.to_string(),
            function_name: TRANSFER_PUBLIC_FUNCTION.to_string(),
            arguments: vec![recipient.to_string(), u64_literal(amount)],
            fee_estimate,
            network,
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: Option<String>) -> Self {
        self.sender = sender;
        self
    }
}

/// Renders an integer with the `u64` type tag the signing layer expects.
pub fn u64_literal(value: u64) -> String {
    format!("{value}u64")
}
