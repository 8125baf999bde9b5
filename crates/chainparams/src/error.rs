use matrixd_consensus::{hash256_to_hex, Hash256, HexError, Network};

/// Failures while assembling or selecting chain parameters.
///
/// None of these are operational errors: each one means the compiled-in
/// tables are inconsistent or the caller named a network that does not exist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChainParamsError {
    GenesisHashMismatch {
        network: Network,
        expected: Hash256,
        actual: Hash256,
    },
    MerkleRootMismatch {
        network: Network,
        expected: Hash256,
        actual: Hash256,
    },
    MalformedSeedTable {
        table: &'static str,
        declared: usize,
        actual: usize,
    },
    InvalidConstant {
        network: Network,
        field: &'static str,
        error: HexError,
    },
    UnknownNetwork(String),
}

impl ChainParamsError {
    /// True when a rebuilt genesis block disagrees with its checkpoint.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            ChainParamsError::GenesisHashMismatch { .. }
                | ChainParamsError::MerkleRootMismatch { .. }
        )
    }
}

impl std::fmt::Display for ChainParamsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainParamsError::GenesisHashMismatch {
                network,
                expected,
                actual,
            } => write!(
                f,
                "{network} genesis hash mismatch (expected {}, got {})",
                hash256_to_hex(expected),
                hash256_to_hex(actual)
            ),
            ChainParamsError::MerkleRootMismatch {
                network,
                expected,
                actual,
            } => write!(
                f,
                "{network} genesis merkle root mismatch (expected {}, got {})",
                hash256_to_hex(expected),
                hash256_to_hex(actual)
            ),
            ChainParamsError::MalformedSeedTable {
                table,
                declared,
                actual,
            } => write!(
                f,
                "seed table {table} declares {declared} entries but holds {actual}"
            ),
            ChainParamsError::InvalidConstant {
                network,
                field,
                error,
            } => write!(f, "{network} constant {field} is invalid: {error}"),
            ChainParamsError::UnknownNetwork(name) => write!(f, "unknown network '{name}'"),
        }
    }
}

impl std::error::Error for ChainParamsError {}

impl From<matrixd_consensus::UnknownNetwork> for ChainParamsError {
    fn from(error: matrixd_consensus::UnknownNetwork) -> Self {
        ChainParamsError::UnknownNetwork(error.0)
    }
}
