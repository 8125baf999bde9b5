//! Transaction merkle root.

use matrixd_consensus::Hash256;

use crate::hash::sha256d;

/// Builds the merkle root over `txids`, duplicating the last entry of any
/// odd-length layer. A single txid is its own root; an empty list yields zero.
pub fn compute_merkle_root(txids: &[Hash256]) -> Hash256 {
    let Some(first) = txids.first() else {
        return [0u8; 32];
    };
    if txids.len() == 1 {
        return *first;
    }

    let mut layer = txids.to_vec();
    while layer.len() > 1 {
        if layer.len() % 2 == 1 {
            let last = layer[layer.len() - 1];
            layer.push(last);
        }
        layer = layer
            .chunks(2)
            .map(|pair| merkle_hash_pair(&pair[0], &pair[1]))
            .collect();
    }
    layer[0]
}

fn merkle_hash_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut buf = [0u8; 64];
    buf[0..32].copy_from_slice(left);
    buf[32..64].copy_from_slice(right);
    sha256d(&buf)
}
