//! Fixed network parameters.

/// Chain id written to the genesis and network id passed to every node.
pub const CHAIN_ID: u64 = 1515;

/// P2P port the bootnode listens on.
pub const BOOTNODE_PORT: u16 = 30210;

/// P2P port of the first node. Node `i` listens on `P2P_PORT_BASE + i - 1`.
pub const P2P_PORT_BASE: u16 = 30301;

/// RPC port of the first node. Node `i` serves RPC on `RPC_PORT_BASE + i - 1`.
pub const RPC_PORT_BASE: u16 = 8545;

/// Upper bound on the number of nodes in a single network.
///
/// The RPC range `[RPC_PORT_BASE, RPC_PORT_BASE + MAX_NODES)` ends right below
/// [`BOOTNODE_PORT`] and the P2P range stays within `u16`, so every port of a network is unique.
pub const MAX_NODES: usize = (BOOTNODE_PORT - RPC_PORT_BASE) as usize;

/// Gas price every node is started with.
pub const GAS_PRICE: u64 = 1;

/// Number of blocks after which clique checkpoints and resets pending votes.
pub const CLIQUE_EPOCH: u64 = 30_000;

/// Host all nodes bind their RPC server to.
pub const RPC_HOST: &str = "localhost";

/// Address the bootnode is reachable at.
pub const BOOTNODE_HOST: &str = "127.0.0.1";

/// RPC namespaces exposed by every node.
pub const RPC_APIS: &str = "personal,db,eth,net,web3,txpool,miner";
