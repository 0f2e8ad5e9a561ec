use crate::{NetworkTopology, TopologyError};

/// Errors raised while validating the parameters of a new network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// Invalid node counts.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// Clique requires a non zero block period.
    #[error("block time should be more than 0")]
    ZeroBlockTime,
}

/// Everything needed to create a new network.
///
/// Only the [`NetworkTopology`] outlives the create operation: the block time ends up in the
/// genesis and the password in `password.txt`.
#[derive(Clone, PartialEq, Eq)]
pub struct NetworkParams {
    topology: NetworkTopology,
    block_time: u64,
    password: String,
}

impl NetworkParams {
    /// Validates and bundles the parameters of a new network.
    pub fn new(
        authorities: usize,
        peers: usize,
        block_time: u64,
        password: impl Into<String>,
    ) -> Result<Self, ParamsError> {
        let topology = NetworkTopology::new(authorities, peers)?;
        if block_time == 0 {
            return Err(ParamsError::ZeroBlockTime)
        }
        Ok(Self { topology, block_time, password: password.into() })
    }

    /// The node counts.
    pub const fn topology(&self) -> NetworkTopology {
        self.topology
    }

    /// Clique block period in seconds, always > 0.
    pub const fn block_time(&self) -> u64 {
        self.block_time
    }

    /// Password protecting every authority account.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for NetworkParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkParams")
            .field("topology", &self.topology)
            .field("block_time", &self.block_time)
            .field("password", &"***")
            .finish()
    }
}
