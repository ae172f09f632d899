pub const ADDRESS_PREFIX: &str = "aleo1";
pub const ADDRESS_LEN: usize = 63;

/// Shape check only; checksum verification is left to the signing wallet.
pub fn is_valid_address(candidate: &str) -> bool {
    candidate.starts_with(ADDRESS_PREFIX) && candidate.chars().count() == ADDRESS_LEN
}

/// `aleo1qqqqqqqq...3ljyzc` style rendering for badges and logs.
pub fn abbreviate_address(address: &str) -> String {
    const HEAD: usize = 12;
    const TAIL: usize = 6;

    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= HEAD + TAIL {
        return address.to_string();
    }
    let head: String = chars[..HEAD].iter().collect();
    let tail: String = chars[chars.len() - TAIL..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
#[path = "tests/address_tests.rs"]
mod tests;
