//! Pure composition of the `credits.aleo/transfer_public` request.

use shared::{
    domain::{NetworkId, TransferRequest},
    error::{ErrorKind, WalletError},
    protocol::TransactionPayload,
};

use crate::{
    address::is_valid_address,
    amount::{estimate_fee, to_smallest_unit},
};

/// Validates the recipient before the amount; the first failure wins.
pub fn build_transfer(
    request: &TransferRequest,
    network: NetworkId,
) -> Result<TransactionPayload, WalletError> {
    if !is_valid_address(&request.recipient) {
        return Err(WalletError::generic(ErrorKind::InvalidRecipient));
    }

    let amount = to_smallest_unit(&request.human_amount)?;
    let fee = estimate_fee(amount);

    Ok(TransactionPayload::transfer_public(
        &request.recipient,
        amount,
        fee,
        network,
    ))
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
