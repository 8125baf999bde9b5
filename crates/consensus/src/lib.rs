//! Consensus constants, network identifiers, and hex helpers.

pub mod constants;
pub mod hex;
pub mod money;
pub mod network;

pub use hex::{
    decode_hex, encode_hex, hash256_from_hex, hash256_to_hex, u256_from_hex, HexError,
};
pub use network::{Base58Type, Network, UnknownNetwork, MAX_BASE58_TYPES};

pub type Hash256 = [u8; 32];
