//! JSON report of the active chain parameters (`--print-params`).

use std::collections::BTreeMap;

use matrixd_chainparams::ChainParams;
use matrixd_consensus::{encode_hex, hash256_to_hex, Base58Type};
use primitive_types::U256;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ParamsReport {
    pub network: &'static str,
    pub message_start: String,
    pub default_port: u16,
    pub rpc_port: u16,
    pub data_dir: &'static str,
    pub alert_key: String,
    pub pow_limit: String,
    pub pos_limit: String,
    pub genesis: GenesisReport,
    pub base58_prefixes: BTreeMap<&'static str, String>,
    pub dns_seeds: Vec<&'static str>,
    pub fixed_seeds: Vec<SeedReport>,
    pub pool_max_transactions: u32,
    pub dummy_pool_address: &'static str,
    pub last_pow_block: i32,
}

#[derive(Debug, Serialize)]
pub struct GenesisReport {
    pub hash: String,
    pub merkle_root: String,
    pub time: u32,
    pub bits: String,
    pub nonce: u32,
    pub version: i32,
}

#[derive(Debug, Serialize)]
pub struct SeedReport {
    pub addr: String,
    pub last_seen: i64,
}

fn u256_to_hex(value: U256) -> String {
    format!("{:0>64}", format!("{value:x}"))
}

impl From<&ChainParams> for ParamsReport {
    fn from(params: &ChainParams) -> Self {
        let header = &params.genesis_block().header;
        Self {
            network: params.network().as_str(),
            message_start: encode_hex(&params.message_start()),
            default_port: params.default_port(),
            rpc_port: params.rpc_port(),
            data_dir: params.data_dir(),
            alert_key: encode_hex(params.alert_key()),
            pow_limit: u256_to_hex(params.pow_limit()),
            pos_limit: u256_to_hex(params.pos_limit()),
            genesis: GenesisReport {
                hash: hash256_to_hex(&params.genesis_hash()),
                merkle_root: hash256_to_hex(&header.merkle_root),
                time: header.time,
                bits: format!("{:08x}", header.bits),
                nonce: header.nonce,
                version: header.version,
            },
            base58_prefixes: Base58Type::ALL
                .iter()
                .map(|kind| (kind.as_str(), encode_hex(params.base58_prefix(*kind))))
                .collect(),
            dns_seeds: params.dns_seeds().to_vec(),
            fixed_seeds: params
                .fixed_seeds()
                .iter()
                .map(|seed| SeedReport {
                    addr: seed.addr.to_string(),
                    last_seen: seed.last_seen,
                })
                .collect(),
            pool_max_transactions: params.pool_max_transactions(),
            dummy_pool_address: params.dummy_pool_address(),
            last_pow_block: params.last_pow_block(),
        }
    }
}
