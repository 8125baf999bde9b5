//! Fixed seed peers.
//!
//! A node only needs one or two of these to answer before gossip hands it a
//! pile of fresher addresses, so each seed is given a `last_seen` between one
//! and two weeks in the past: old enough to lose to real gossip, recent
//! enough not to be discarded as stale.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::time::{SystemTime, UNIX_EPOCH};

use matrixd_consensus::constants::{NODE_NETWORK, ONE_WEEK};
use rand::Rng;

use crate::error::ChainParamsError;

/// A compiled-in peer: IPv6 (or IPv4-mapped) address bytes and port.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeedSpec {
    pub addr: [u8; 16],
    pub port: u16,
}

impl SeedSpec {
    pub const fn ipv4(octets: [u8; 4], port: u16) -> Self {
        Self {
            addr: [
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, octets[0], octets[1], octets[2],
                octets[3],
            ],
            port,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        let ip = Ipv6Addr::from(self.addr);
        let ip = match ip.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(ip),
        };
        SocketAddr::new(ip, self.port)
    }
}

/// A named seed table together with the entry count it was generated with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeedTable {
    pub name: &'static str,
    pub entries: &'static [SeedSpec],
    pub declared_len: usize,
}

impl SeedTable {
    pub const EMPTY: SeedTable = SeedTable {
        name: "empty",
        entries: &[],
        declared_len: 0,
    };
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SeedAddress {
    pub addr: SocketAddr,
    pub services: u64,
    pub last_seen: i64,
}

/// Converts `table` into peer records stamped relative to `now` (unix seconds).
///
/// Every `last_seen` lands in `[now - 2 weeks, now - 1 week)`.
pub fn materialize_seeds<R: Rng + ?Sized>(
    table: &SeedTable,
    now: i64,
    rng: &mut R,
) -> Result<Vec<SeedAddress>, ChainParamsError> {
    if table.entries.len() != table.declared_len {
        return Err(ChainParamsError::MalformedSeedTable {
            table: table.name,
            declared: table.declared_len,
            actual: table.entries.len(),
        });
    }

    Ok(table
        .entries
        .iter()
        .map(|spec| SeedAddress {
            addr: spec.socket_addr(),
            services: NODE_NETWORK,
            last_seen: now - ONE_WEEK - rng.gen_range(1..=ONE_WEEK),
        })
        .collect())
}

/// [`materialize_seeds`] against the wall clock and the thread-local RNG.
pub fn materialize_seeds_now(table: &SeedTable) -> Result<Vec<SeedAddress>, ChainParamsError> {
    materialize_seeds(table, unix_now(), &mut rand::thread_rng())
}

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::net::Ipv4Addr;

    const TABLE: [SeedSpec; 3] = [
        SeedSpec::ipv4([10, 0, 0, 1], 22616),
        SeedSpec::ipv4([10, 0, 0, 2], 22617),
        SeedSpec {
            addr: [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            port: 32616,
        },
    ];

    fn table() -> SeedTable {
        SeedTable {
            name: "test",
            entries: &TABLE,
            declared_len: TABLE.len(),
        }
    }

    #[test]
    fn keeps_length_and_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let seeds = materialize_seeds(&table(), 1_700_000_000, &mut rng).expect("seeds");
        assert_eq!(seeds.len(), 3);
        assert_eq!(
            seeds[0].addr,
            SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 22616)
        );
        assert_eq!(seeds[1].addr.port(), 22617);
        assert!(seeds[2].addr.is_ipv6());
        assert!(seeds.iter().all(|seed| seed.services == NODE_NETWORK));
    }

    #[test]
    fn last_seen_between_one_and_two_weeks_ago() {
        let now = 1_700_000_000;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for addr in materialize_seeds(&table(), now, &mut rng).expect("seeds") {
                assert!(addr.last_seen >= now - 2 * ONE_WEEK);
                assert!(addr.last_seen < now - ONE_WEEK);
            }
        }
    }

    #[test]
    fn wall_clock_materialization_is_bounded() {
        let before = unix_now();
        let seeds = materialize_seeds_now(&table()).expect("seeds");
        let after = unix_now();
        for seed in seeds {
            assert!(seed.last_seen >= before - 2 * ONE_WEEK);
            assert!(seed.last_seen < after - ONE_WEEK);
        }
    }

    #[test]
    fn empty_table_yields_no_seeds() {
        let mut rng = StdRng::seed_from_u64(1);
        let seeds = materialize_seeds(&SeedTable::EMPTY, 0, &mut rng).expect("seeds");
        assert!(seeds.is_empty());
    }

    #[test]
    fn declared_length_must_match() {
        let malformed = SeedTable {
            declared_len: 4,
            ..table()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            materialize_seeds(&malformed, 0, &mut rng),
            Err(ChainParamsError::MalformedSeedTable {
                table: "test",
                declared: 4,
                actual: 3,
            })
        );
    }
}
