//! Genesis block construction.

use matrixd_consensus::constants::{GENESIS_SCRIPT_MARKER, GENESIS_TX_VERSION, SEQUENCE_FINAL};
use matrixd_consensus::money::Amount;
use matrixd_consensus::{decode_hex, HexError};
use matrixd_primitives::script::{pay_to_pubkey, Script};
use matrixd_primitives::{Block, BlockHeader, OutPoint, Transaction, TxIn, TxOut};

/// The hand-picked values a network's genesis block is derived from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GenesisInputs {
    pub timestamp: &'static str,
    pub output_pubkey_hex: &'static str,
    pub time: u32,
    pub nonce: u32,
    pub bits: u32,
    pub version: i32,
    pub reward: Amount,
}

impl GenesisInputs {
    pub fn output_script(&self) -> Result<Script, HexError> {
        Ok(pay_to_pubkey(&decode_hex(self.output_pubkey_hex)?))
    }

    pub fn build(&self) -> Result<Block, HexError> {
        let output_script = self.output_script()?;
        Ok(create_genesis_block(
            self.timestamp,
            &output_script,
            self.time,
            self.nonce,
            self.bits,
            self.version,
            self.reward,
        ))
    }
}

/// Builds a one-transaction genesis block.
///
/// The coinbase script sig carries `time`, a small marker number and the
/// timestamp text; it is never executed, it only commits the text into the
/// transaction hash. The result depends on nothing but the arguments.
pub fn create_genesis_block(
    timestamp: &str,
    output_script: &Script,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: Amount,
) -> Block {
    let script_sig = Script::new()
        .push_int(i64::from(time))
        .push_num(GENESIS_SCRIPT_MARKER)
        .push_slice(timestamp.as_bytes());

    let coinbase = Transaction {
        version: GENESIS_TX_VERSION,
        time,
        vin: vec![TxIn {
            prevout: OutPoint::null(),
            script_sig: script_sig.into_bytes(),
            sequence: SEQUENCE_FINAL,
        }],
        vout: vec![TxOut {
            value: reward,
            script_pubkey: output_script.as_bytes().to_vec(),
        }],
        lock_time: 0,
    };

    let mut block = Block {
        header: BlockHeader {
            version,
            prev_block: [0u8; 32],
            merkle_root: [0u8; 32],
            time,
            bits,
            nonce,
        },
        transactions: vec![coinbase],
        signature: Vec::new(),
    };
    block.header.merkle_root = block.compute_merkle_root();
    block
}
