//! Keccak-256 fingerprints of canonical signatures.
//!
//! A function or custom error is identified by the first four bytes of
//! `keccak256("name(type1,type2,...)")`, an event by the full 32-byte hash:
//!   keccak256("Transfer(address,address,uint256)")
//!   → 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
//!
//! Every call builds its own hasher, so these functions are safe to use
//! from any number of threads.

use alloy_primitives::B256;
use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// 4-byte selector of a function or custom error signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// 32-byte topic0 of an event signature.
pub fn topic0(signature: &str) -> B256 {
    B256::from(keccak256(signature.as_bytes()))
}

/// `0x` + 8 lowercase hex digits.
pub fn selector_hex(selector: &[u8; 4]) -> String {
    format!("0x{}", hex::encode(selector))
}

/// Parse a 4-byte selector from hex, with or without `0x`, any case.
pub fn parse_selector(text: &str) -> Option<[u8; 4]> {
    let bytes = decode_hex(text)?;
    <[u8; 4]>::try_from(bytes.as_slice()).ok()
}

/// Parse a 32-byte topic from hex, with or without `0x`, any case.
pub fn parse_topic(text: &str) -> Option<B256> {
    let bytes = decode_hex(text)?;
    (bytes.len() == 32).then(|| B256::from_slice(&bytes))
}

fn decode_hex(text: &str) -> Option<Vec<u8>> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_hash() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn erc20_transfer_selectors() {
        assert_eq!(selector_hex(&selector("transfer(address,uint256)")), "0xa9059cbb");
        assert_eq!(
            selector_hex(&selector("transfer(address,address,uint256)")),
            "0xbeabacc8"
        );
    }

    #[test]
    fn erc20_transfer_topic() {
        assert_eq!(
            topic0("Transfer(address,address,uint256)").to_string(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn parse_selector_accepts_any_case_and_prefix() {
        assert_eq!(parse_selector("0xA9059CBB"), Some([0xa9, 0x05, 0x9c, 0xbb]));
        assert_eq!(parse_selector("a9059cbb"), Some([0xa9, 0x05, 0x9c, 0xbb]));
        assert_eq!(parse_selector("0xa9059c"), None);
        assert_eq!(parse_selector("zz"), None);
    }

    #[test]
    fn parse_topic_requires_32_bytes() {
        let hex = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
        assert_eq!(parse_topic(hex), Some(topic0("Transfer(address,address,uint256)")));
        assert_eq!(parse_topic("0xddf252ad"), None);
    }
}
