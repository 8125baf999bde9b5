//! Per-network chain parameters for the Matrix network.
//!
//! Every network's parameters are assembled once, checked against the
//! compiled-in genesis checkpoints, and then shared read-only for the rest of
//! the process. [`select_params`] chooses which network [`params`] returns.

pub mod error;
pub mod genesis;
pub mod params;
pub mod seeds;
pub mod select;

pub use error::ChainParamsError;
pub use genesis::{create_genesis_block, GenesisInputs};
pub use params::{
    build_chain_params, build_chain_params_at, ChainParams, NetworkTemplate, Registry,
};
pub use seeds::{materialize_seeds, materialize_seeds_now, SeedAddress, SeedSpec, SeedTable};
pub use select::{
    base58_prefix, current_network, dns_seeds, fixed_seeds, genesis_block, genesis_hash, init,
    network_id, params, pos_limit, pow_limit, select_params, select_params_by_name,
    select_params_from_args, Selector,
};
