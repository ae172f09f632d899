use super::*;
use shared::protocol::{CREDITS_PROGRAM_ID, TRANSFER_PUBLIC_FUNCTION};

fn recipient() -> String {
    format!("aleo1{}", "x".repeat(58))
}

#[test]
fn builds_transfer_public_payload() {
    let request = TransferRequest::new(recipient(), "0.1");
    let payload = build_transfer(&request, NetworkId::Testnet).expect("payload");

    assert_eq!(payload.program_id, CREDITS_PROGRAM_ID);
    assert_eq!(payload.function_name, TRANSFER_PUBLIC_FUNCTION);
    assert_eq!(payload.arguments, vec![recipient(), "100000u64".to_string()]);
    assert_eq!(payload.fee_estimate, 11_000);
    assert_eq!(payload.network, NetworkId::Testnet);
    assert_eq!(payload.sender, None);
}

#[test]
fn invalid_recipient_is_reported_before_invalid_amount() {
    let request = TransferRequest::new("bleo1nope", "abc");
    let err = build_transfer(&request, NetworkId::Mainnet).expect_err("recipient");
    assert_eq!(err.kind, ErrorKind::InvalidRecipient);
}

#[test]
fn invalid_amount_is_reported_for_valid_recipient() {
    let request = TransferRequest::new(recipient(), "-3");
    let err = build_transfer(&request, NetworkId::Mainnet).expect_err("amount");
    assert_eq!(err.kind, ErrorKind::InvalidAmount);
}
