//! Hex conversions for compiled-in constants.
//!
//! 256-bit values are written big-endian (display order) in source and stored
//! little-endian, matching how hashes are serialized on the wire.

use primitive_types::U256;

use crate::Hash256;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HexError {
    InvalidLength,
    InvalidHex,
}

impl std::fmt::Display for HexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HexError::InvalidLength => write!(f, "hex string has invalid length"),
            HexError::InvalidHex => write!(f, "hex string contains invalid characters"),
        }
    }
}

impl std::error::Error for HexError {}

fn strip_prefix(input: &str) -> &str {
    let hex = input.trim();
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

pub fn hash256_from_hex(input: &str) -> Result<Hash256, HexError> {
    let hex = strip_prefix(input);
    if hex.is_empty() || hex.len() > 64 {
        return Err(HexError::InvalidLength);
    }

    let mut padded = String::with_capacity(64);
    for _ in 0..(64 - hex.len()) {
        padded.push('0');
    }
    padded.push_str(hex);

    let mut bytes = [0u8; 32];
    for (i, byte_out) in bytes.iter_mut().enumerate() {
        let start = i * 2;
        *byte_out = u8::from_str_radix(&padded[start..start + 2], 16)
            .map_err(|_| HexError::InvalidHex)?;
    }
    bytes.reverse();
    Ok(bytes)
}

pub fn hash256_to_hex(hash: &Hash256) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(64);
    for byte in hash.iter().rev() {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

pub fn u256_from_hex(input: &str) -> Result<U256, HexError> {
    let bytes = hash256_from_hex(input)?;
    Ok(U256::from_little_endian(&bytes))
}

pub fn encode_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Decodes a plain byte string. An empty input yields an empty vector.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, HexError> {
    let hex = strip_prefix(input);
    if hex.len() % 2 == 1 {
        return Err(HexError::InvalidLength);
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = hex
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or(HexError::InvalidHex)?;
        bytes.push(byte);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_hex_is_display_order() {
        let hash = hash256_from_hex(
            "0000004a95cff432b947c59b46fb8f795651eb5eb3094f612a9efebe168f9b87",
        )
        .expect("hash");
        assert_eq!(hash[0], 0x87);
        assert_eq!(hash[31], 0x00);
        assert_eq!(
            hash256_to_hex(&hash),
            "0000004a95cff432b947c59b46fb8f795651eb5eb3094f612a9efebe168f9b87"
        );
    }

    #[test]
    fn short_hash_is_left_padded() {
        let hash = hash256_from_hex("0x01").expect("hash");
        assert_eq!(hash[0], 0x01);
        assert!(hash[1..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn hash_rejects_bad_input() {
        assert_eq!(hash256_from_hex(""), Err(HexError::InvalidLength));
        assert_eq!(hash256_from_hex(&"f".repeat(65)), Err(HexError::InvalidLength));
        assert_eq!(hash256_from_hex("zz"), Err(HexError::InvalidHex));
    }

    #[test]
    fn u256_limit_value() {
        let limit = u256_from_hex(
            "000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .expect("limit");
        assert_eq!(limit, (U256::one() << 232) - U256::one());
    }

    #[test]
    fn decode_plain_bytes() {
        assert_eq!(decode_hex("").expect("empty"), Vec::<u8>::new());
        assert_eq!(decode_hex("04ac").expect("bytes"), vec![0x04, 0xac]);
        assert_eq!(decode_hex("abc"), Err(HexError::InvalidLength));
        assert_eq!(decode_hex("zz"), Err(HexError::InvalidHex));
        assert_eq!(encode_hex(&[0xb5, 0x0d]), "b50d");
    }
}
