//! Process-wide network selection.
//!
//! The registry is built once, on the first call to [`init`] (or lazily on the
//! first read). Selection is a single atomic store, so readers on other threads
//! always observe one complete, verified [`ChainParams`].

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use matrixd_consensus::{hash256_to_hex, Base58Type, Hash256, Network};
use matrixd_log::{log_error, log_info};
use matrixd_primitives::Block;
use primitive_types::U256;

use crate::error::ChainParamsError;
use crate::params::{ChainParams, Registry};
use crate::seeds::SeedAddress;

/// Tracks which network of a registry is current. Starts on mainnet.
#[derive(Debug)]
pub struct Selector<'a> {
    registry: &'a Registry,
    current: AtomicU8,
}

impl<'a> Selector<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            current: AtomicU8::new(Network::Mainnet.id()),
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn select(&self, network: Network) -> &'a ChainParams {
        self.current.store(network.id(), Ordering::Release);
        let params = self.registry.get(network);
        log_info!(
            "Selected {network} network (genesis {})",
            hash256_to_hex(&params.genesis_hash())
        );
        params
    }

    pub fn select_by_name(&self, name: &str) -> Result<&'a ChainParams, ChainParamsError> {
        let network = name.parse::<Network>()?;
        Ok(self.select(network))
    }

    /// `-testnet` present selects testnet, otherwise mainnet.
    pub fn select_from_args(&self, testnet: bool) -> &'a ChainParams {
        self.select(if testnet {
            Network::Testnet
        } else {
            Network::Mainnet
        })
    }

    pub fn current_network(&self) -> Network {
        // Only `select` writes the cell, always with a valid id.
        Network::from_id(self.current.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn current(&self) -> &'a ChainParams {
        self.registry.get(self.current_network())
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();
static SELECTOR: OnceLock<Selector<'static>> = OnceLock::new();

/// Builds and verifies every network's parameters if that has not happened yet.
///
/// Call this during startup, before other subsystems read [`params`], so a
/// broken build is reported as an error instead of a panic.
pub fn init() -> Result<&'static Selector<'static>, ChainParamsError> {
    if let Some(selector) = SELECTOR.get() {
        return Ok(selector);
    }
    let registry = match REGISTRY.get() {
        Some(registry) => registry,
        None => {
            let built = Registry::build()?;
            REGISTRY.get_or_init(|| built)
        }
    };
    Ok(SELECTOR.get_or_init(|| Selector::new(registry)))
}

fn selector() -> &'static Selector<'static> {
    match init() {
        Ok(selector) => selector,
        Err(err) => {
            log_error!("Chain parameter self-check failed: {err}");
            panic!("chain parameter self-check failed: {err}");
        }
    }
}

pub fn select_params(network: Network) -> Result<&'static ChainParams, ChainParamsError> {
    Ok(init()?.select(network))
}

pub fn select_params_by_name(name: &str) -> Result<&'static ChainParams, ChainParamsError> {
    init()?.select_by_name(name)
}

pub fn select_params_from_args(testnet: bool) -> Result<&'static ChainParams, ChainParamsError> {
    Ok(init()?.select_from_args(testnet))
}

/// Parameters of the currently selected network.
///
/// # Panics
///
/// Panics if the registry has not been initialized and fails its self-check.
pub fn params() -> &'static ChainParams {
    selector().current()
}

pub fn current_network() -> Network {
    selector().current_network()
}

pub fn network_id() -> Network {
    params().network()
}

pub fn genesis_block() -> &'static Block {
    params().genesis_block()
}

pub fn genesis_hash() -> Hash256 {
    params().genesis_hash()
}

pub fn fixed_seeds() -> &'static [SeedAddress] {
    params().fixed_seeds()
}

pub fn dns_seeds() -> &'static [&'static str] {
    params().dns_seeds()
}

pub fn base58_prefix(kind: Base58Type) -> &'static [u8] {
    params().base58_prefix(kind)
}

pub fn pow_limit() -> U256 {
    params().pow_limit()
}

pub fn pos_limit() -> U256 {
    params().pos_limit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_starts_on_mainnet() {
        let registry = Registry::build().expect("registry");
        let selector = Selector::new(&registry);
        assert_eq!(selector.current_network(), Network::Mainnet);
        assert_eq!(selector.current().network(), Network::Mainnet);
    }

    #[test]
    fn selection_is_exclusive() {
        let registry = Registry::build().expect("registry");
        let selector = Selector::new(&registry);
        let main_hash = selector.current().genesis_hash();

        let test = selector.select(Network::Testnet);
        assert_eq!(test.network(), Network::Testnet);
        assert_eq!(selector.current().network(), Network::Testnet);
        assert_ne!(selector.current().genesis_hash(), main_hash);

        selector.select(Network::Mainnet);
        assert_eq!(selector.current().network(), Network::Mainnet);
        assert_eq!(selector.current().genesis_hash(), main_hash);
    }

    #[test]
    fn select_from_flag() {
        let registry = Registry::build().expect("registry");
        let selector = Selector::new(&registry);
        assert_eq!(selector.select_from_args(true).network(), Network::Testnet);
        assert_eq!(selector.select_from_args(false).network(), Network::Mainnet);
    }

    #[test]
    fn unknown_name_is_rejected_and_keeps_current() {
        let registry = Registry::build().expect("registry");
        let selector = Selector::new(&registry);
        selector.select(Network::Testnet);
        assert_eq!(
            selector.select_by_name("regtest").map(|params| params.network()),
            Err(ChainParamsError::UnknownNetwork("regtest".to_string()))
        );
        assert_eq!(selector.current_network(), Network::Testnet);
        assert_eq!(
            selector.select_by_name("main").map(|params| params.network()),
            Ok(Network::Mainnet)
        );
    }
}
