//! Network templates and the parameter registry.

use matrixd_consensus::constants::GENESIS_BLOCK_VERSION;
use matrixd_consensus::money::COIN;
use matrixd_consensus::{
    decode_hex, hash256_from_hex, hash256_to_hex, u256_from_hex, Base58Type, Hash256, HexError,
    Network, MAX_BASE58_TYPES,
};
use matrixd_log::{log_debug, log_error};
use matrixd_primitives::Block;
use primitive_types::U256;
use rand::Rng;

use crate::error::ChainParamsError;
use crate::genesis::GenesisInputs;
use crate::seeds::{materialize_seeds, unix_now, SeedAddress, SeedSpec, SeedTable};

/// Everything that distinguishes one network, before any derived value is
/// computed or checked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NetworkTemplate {
    pub network: Network,
    /// Unlikely in normal data: rarely used upper ASCII, invalid UTF-8, and a
    /// large 32-bit integer at any alignment.
    pub message_start: [u8; 4],
    pub alert_key_hex: &'static str,
    pub default_port: u16,
    pub rpc_port: u16,
    pub data_dir: &'static str,
    pub pow_limit_hex: &'static str,
    pub pos_limit_hex: &'static str,
    pub genesis: GenesisInputs,
    pub expected_genesis_hash: &'static str,
    pub expected_merkle_root: &'static str,
    pub base58_prefixes: [&'static [u8]; MAX_BASE58_TYPES],
    pub dns_seeds: &'static [&'static str],
    pub fixed_seeds: SeedTable,
    pub pool_max_transactions: u32,
    pub dummy_pool_address: &'static str,
    pub last_pow_block: i32,
}

const GENESIS_TIMESTAMP: &str = "June 26, 2017. The MatrixNetwork release. ";
const GENESIS_PUBKEY_HEX: &str = "047ce17a53d2899bc7d08eabdc145fffe21ace10b40ab87283d0da0973799c5108b078fa3decd5d5edb9d20c7a0f2e3f9a2ecd8186c7597215ffa0e3c7712c186f";

const MAINNET_DNS_SEEDS: [&str; 4] = [
    "47.94.23.17",
    "dn1.coinbt.cc",
    "dn2.coinbt.cc",
    "dn3.coinbt.cc",
];

const TESTNET_DNS_SEEDS: [&str; 1] = ["tdn1.coinbt.cc"];

// Placeholder for the generated seed table; only the first DNS seed is known.
const MAINNET_FIXED_SEEDS: [SeedSpec; 1] = [SeedSpec::ipv4([47, 94, 23, 17], 22616)];

const TESTNET_FIXED_SEEDS: [SeedSpec; 0] = [];

pub fn mainnet_template() -> NetworkTemplate {
    NetworkTemplate {
        network: Network::Mainnet,
        message_start: [0xb5, 0xd2, 0xc9, 0xdd],
        alert_key_hex: "0479092544530794af3a4fe9be71d5579ec1928818cb291ed92f9edfd7bbc0db6eb22a6db93805fbc231c909aeceb48015c7fa7bff6b7805fe6ffd827c3850f0d0",
        default_port: 22_616,
        rpc_port: 22_617,
        data_dir: "",
        pow_limit_hex: "000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        pos_limit_hex: "00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        genesis: GenesisInputs {
            timestamp: GENESIS_TIMESTAMP,
            output_pubkey_hex: GENESIS_PUBKEY_HEX,
            time: 1_498_464_000,
            nonce: 32_736_273,
            bits: 0x1e00ffff,
            version: GENESIS_BLOCK_VERSION,
            reward: COIN,
        },
        expected_genesis_hash: "0000004a95cff432b947c59b46fb8f795651eb5eb3094f612a9efebe168f9b87",
        expected_merkle_root: "28d13889cf470fec50e85320ee429ea81c7769e7a71789c1eb9143ffa310499e",
        base58_prefixes: [
            &[51],
            &[110],
            &[153],
            &[40],
            &[0x04, 0x88, 0xb2, 0x1e],
            &[0x04, 0x88, 0xad, 0xe4],
        ],
        dns_seeds: &MAINNET_DNS_SEEDS,
        fixed_seeds: SeedTable {
            name: "main",
            entries: &MAINNET_FIXED_SEEDS,
            declared_len: 1,
        },
        pool_max_transactions: 3,
        dummy_pool_address: "MjC9wSML9ERe6Yzq5pgWqbc2dcXhRsP37G",
        last_pow_block: 30_000,
    }
}

/// Mainnet with testnet's overrides applied.
pub fn testnet_template() -> NetworkTemplate {
    let base = mainnet_template();
    NetworkTemplate {
        network: Network::Testnet,
        message_start: [0xdb, 0x86, 0xfc, 0x69],
        alert_key_hex: "",
        default_port: 32_616,
        rpc_port: 32_617,
        data_dir: "testnet",
        genesis: GenesisInputs {
            time: 1_491_737_471,
            nonce: 11_529_375,
            ..base.genesis
        },
        expected_genesis_hash: "000000c31c49392a968012994859c8d72e1d10789580ebd418651af47aadc81b",
        expected_merkle_root: "8f4105adf3b715004a371ad5b375476f5cff5529e8eb63a8be70565eeb948da1",
        base58_prefixes: [
            &[97],
            &[196],
            &[239],
            &[40],
            &[0x04, 0x35, 0x87, 0xcf],
            &[0x04, 0x35, 0x83, 0x94],
        ],
        dns_seeds: &TESTNET_DNS_SEEDS,
        fixed_seeds: SeedTable {
            name: "test",
            entries: &TESTNET_FIXED_SEEDS,
            declared_len: 0,
        },
        dummy_pool_address: "gCJDCcmcVZcfnwAZdEt7dg5s5jjAbDp9dZdhXAmP5NM",
        last_pow_block: 300,
        ..base
    }
}

pub fn network_template(network: Network) -> NetworkTemplate {
    match network {
        Network::Mainnet => mainnet_template(),
        Network::Testnet => testnet_template(),
    }
}

/// Fully assembled, checkpoint-verified parameters for one network.
///
/// Values only come out of [`build_chain_params`], so holding one means its
/// genesis block already matched the compiled-in checkpoints.
#[derive(Clone, Debug)]
pub struct ChainParams {
    network: Network,
    message_start: [u8; 4],
    alert_key: Vec<u8>,
    default_port: u16,
    rpc_port: u16,
    data_dir: &'static str,
    pow_limit: U256,
    pos_limit: U256,
    base58_prefixes: [&'static [u8]; MAX_BASE58_TYPES],
    dns_seeds: &'static [&'static str],
    fixed_seeds: Vec<SeedAddress>,
    genesis: Block,
    genesis_hash: Hash256,
    pool_max_transactions: u32,
    dummy_pool_address: &'static str,
    last_pow_block: i32,
}

impl ChainParams {
    pub fn network(&self) -> Network {
        self.network
    }

    pub fn message_start(&self) -> [u8; 4] {
        self.message_start
    }

    /// Key that signs network alerts; empty when the network has none.
    pub fn alert_key(&self) -> &[u8] {
        &self.alert_key
    }

    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    pub fn rpc_port(&self) -> u16 {
        self.rpc_port
    }

    /// Sub-directory of the base data dir; empty for mainnet.
    pub fn data_dir(&self) -> &'static str {
        self.data_dir
    }

    pub fn pow_limit(&self) -> U256 {
        self.pow_limit
    }

    pub fn pos_limit(&self) -> U256 {
        self.pos_limit
    }

    pub fn base58_prefix(&self, kind: Base58Type) -> &'static [u8] {
        self.base58_prefixes[kind.as_usize()]
    }

    pub fn dns_seeds(&self) -> &'static [&'static str] {
        self.dns_seeds
    }

    pub fn fixed_seeds(&self) -> &[SeedAddress] {
        &self.fixed_seeds
    }

    pub fn genesis_block(&self) -> &Block {
        &self.genesis
    }

    pub fn genesis_hash(&self) -> Hash256 {
        self.genesis_hash
    }

    pub fn pool_max_transactions(&self) -> u32 {
        self.pool_max_transactions
    }

    pub fn dummy_pool_address(&self) -> &'static str {
        self.dummy_pool_address
    }

    pub fn last_pow_block(&self) -> i32 {
        self.last_pow_block
    }
}

fn constant<T>(
    network: Network,
    field: &'static str,
    parsed: Result<T, HexError>,
) -> Result<T, ChainParamsError> {
    parsed.map_err(|error| ChainParamsError::InvalidConstant {
        network,
        field,
        error,
    })
}

/// Assembles `template` and checks its genesis block against the expected
/// hash and merkle root. Seeds are stamped relative to `now` using `rng`.
pub fn build_chain_params_at<R: Rng + ?Sized>(
    template: &NetworkTemplate,
    now: i64,
    rng: &mut R,
) -> Result<ChainParams, ChainParamsError> {
    let network = template.network;
    let alert_key = constant(network, "alert_key", decode_hex(template.alert_key_hex))?;
    let pow_limit = constant(network, "pow_limit", u256_from_hex(template.pow_limit_hex))?;
    let pos_limit = constant(network, "pos_limit", u256_from_hex(template.pos_limit_hex))?;
    let expected_hash = constant(
        network,
        "genesis_hash",
        hash256_from_hex(template.expected_genesis_hash),
    )?;
    let expected_root = constant(
        network,
        "merkle_root",
        hash256_from_hex(template.expected_merkle_root),
    )?;

    let genesis = constant(network, "genesis_pubkey", template.genesis.build())?;
    let genesis_hash = genesis.hash();
    if genesis_hash != expected_hash {
        log_error!(
            "{network} genesis hash {} does not match checkpoint {}",
            hash256_to_hex(&genesis_hash),
            hash256_to_hex(&expected_hash)
        );
        return Err(ChainParamsError::GenesisHashMismatch {
            network,
            expected: expected_hash,
            actual: genesis_hash,
        });
    }
    let merkle_root = genesis.header.merkle_root;
    if merkle_root != expected_root {
        log_error!(
            "{network} genesis merkle root {} does not match checkpoint {}",
            hash256_to_hex(&merkle_root),
            hash256_to_hex(&expected_root)
        );
        return Err(ChainParamsError::MerkleRootMismatch {
            network,
            expected: expected_root,
            actual: merkle_root,
        });
    }

    let fixed_seeds = materialize_seeds(&template.fixed_seeds, now, rng)?;
    log_debug!(
        "built {network} parameters: genesis {} ({} dns seeds, {} fixed seeds)",
        hash256_to_hex(&genesis_hash),
        template.dns_seeds.len(),
        fixed_seeds.len()
    );

    Ok(ChainParams {
        network,
        message_start: template.message_start,
        alert_key,
        default_port: template.default_port,
        rpc_port: template.rpc_port,
        data_dir: template.data_dir,
        pow_limit,
        pos_limit,
        base58_prefixes: template.base58_prefixes,
        dns_seeds: template.dns_seeds,
        fixed_seeds,
        genesis,
        genesis_hash,
        pool_max_transactions: template.pool_max_transactions,
        dummy_pool_address: template.dummy_pool_address,
        last_pow_block: template.last_pow_block,
    })
}

pub fn build_chain_params(template: &NetworkTemplate) -> Result<ChainParams, ChainParamsError> {
    build_chain_params_at(template, unix_now(), &mut rand::thread_rng())
}

/// Verified parameters for every known network.
#[derive(Debug)]
pub struct Registry {
    networks: [ChainParams; 2],
}

impl Registry {
    pub fn build() -> Result<Self, ChainParamsError> {
        Ok(Self {
            networks: [
                build_chain_params(&mainnet_template())?,
                build_chain_params(&testnet_template())?,
            ],
        })
    }

    pub fn get(&self, network: Network) -> &ChainParams {
        &self.networks[network.id() as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainParams> {
        self.networks.iter()
    }
}
