use shared::error::{ErrorKind, WalletError};

/// 1 credit = 1,000,000 microcredits.
pub const SMALLEST_UNITS_PER_CREDIT: u64 = 1_000_000;
pub const BASE_FEE: u64 = 10_000;
const VARIABLE_FEE_DIVISOR: u64 = 100;

pub fn to_smallest_unit(human: &str) -> Result<u64, WalletError> {
    let value: f64 = human
        .trim()
        .parse()
        .map_err(|_| WalletError::generic(ErrorKind::InvalidAmount))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(WalletError::generic(ErrorKind::InvalidAmount));
    }

    let scaled = (value * SMALLEST_UNITS_PER_CREDIT as f64).floor();
    if scaled >= u64::MAX as f64 {
        return Err(WalletError::new(
            ErrorKind::InvalidAmount,
            "Amount exceeds the maximum transferable value",
        ));
    }

    Ok(scaled as u64)
}

/// 1% of the amount, floored, plus the fixed base fee.
pub fn estimate_fee(smallest_unit_amount: u64) -> u64 {
    (smallest_unit_amount / VARIABLE_FEE_DIVISOR).saturating_add(BASE_FEE)
}

pub fn format_credits(smallest_unit_amount: u64) -> String {
    format!(
        "{}.{:06}",
        smallest_unit_amount / SMALLEST_UNITS_PER_CREDIT,
        smallest_unit_amount % SMALLEST_UNITS_PER_CREDIT
    )
}

#[cfg(test)]
#[path = "tests/amount_tests.rs"]
mod tests;
