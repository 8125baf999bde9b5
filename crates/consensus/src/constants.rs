//! Protocol constants shared by every network.

/// Version written into the genesis block header.
pub const GENESIS_BLOCK_VERSION: i32 = 1;
/// Version written into the genesis coinbase transaction.
pub const GENESIS_TX_VERSION: i32 = 1;
/// Small integer pushed between the time and the timestamp text in the genesis script sig.
pub const GENESIS_SCRIPT_MARKER: i64 = 4;

/// Service bit advertised by full nodes.
pub const NODE_NETWORK: u64 = 1;

/// Seconds in one week; seed peers are aged between one and two of these.
pub const ONE_WEEK: i64 = 7 * 24 * 60 * 60;

/// Sequence value of a final transaction input.
pub const SEQUENCE_FINAL: u32 = u32::MAX;
