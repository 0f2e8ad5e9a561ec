use crate::constants::{MAX_NODES, P2P_PORT_BASE, RPC_PORT_BASE};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

/// Errors raised when a topology violates the network constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Clique needs at least one signer to seal blocks.
    #[error("at least 1 authority node is required")]
    NoAuthorities,
    /// The node count does not fit into the reserved port ranges.
    #[error("{0} nodes requested, at most {MAX_NODES} are supported")]
    TooManyNodes(usize),
}

/// Number of authority and peer nodes making up a network.
///
/// This is the unit persisted by the state store, serialized as `{"authorities":_,"peers":_}`.
/// Deserialization runs the same validation as [`NetworkTopology::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTopology")]
pub struct NetworkTopology {
    authorities: usize,
    peers: usize,
}

impl NetworkTopology {
    /// Creates a new topology.
    ///
    /// Fails if there is no authority, or if the total node count exceeds [`MAX_NODES`].
    pub const fn new(authorities: usize, peers: usize) -> Result<Self, TopologyError> {
        if authorities == 0 {
            return Err(TopologyError::NoAuthorities)
        }
        let total = authorities.saturating_add(peers);
        if total > MAX_NODES {
            return Err(TopologyError::TooManyNodes(total))
        }
        Ok(Self { authorities, peers })
    }

    /// Number of block sealing nodes.
    pub const fn authorities(&self) -> usize {
        self.authorities
    }

    /// Number of non sealing nodes.
    pub const fn peers(&self) -> usize {
        self.peers
    }

    /// Total number of nodes, bootnode excluded.
    pub const fn total_nodes(&self) -> usize {
        self.authorities + self.peers
    }

    /// Plans every node of the network.
    ///
    /// Nodes are returned in ascending index order starting at 1. The first
    /// [`authorities`](Self::authorities) nodes are [`NodeRole::Authority`], the rest are
    /// [`NodeRole::Peer`].
    pub fn node_specs(&self) -> Vec<NodeSpec> {
        (1..=self.total_nodes())
            .map(|index| {
                let role =
                    if index <= self.authorities { NodeRole::Authority } else { NodeRole::Peer };
                NodeSpec::new(index, role)
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct RawTopology {
    authorities: usize,
    peers: usize,
}

impl TryFrom<RawTopology> for NetworkTopology {
    type Error = TopologyError;

    fn try_from(raw: RawTopology) -> Result<Self, Self::Error> {
        Self::new(raw.authorities, raw.peers)
    }
}

/// Whether a node seals blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Unlocks its account and mines.
    Authority,
    /// Follows the chain only.
    Peer,
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authority => write!(f, "Authority"),
            Self::Peer => write!(f, "Peer"),
        }
    }
}

/// A single planned node.
///
/// Derived from the [`NetworkTopology`], never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeSpec {
    /// 1-based position of the node.
    pub index: usize,
    /// Role of the node.
    pub role: NodeRole,
    /// Data directory, relative to the working area.
    pub data_dir: PathBuf,
    /// devp2p listening port.
    pub p2p_port: u16,
    /// HTTP RPC port.
    pub rpc_port: u16,
}

impl NodeSpec {
    fn new(index: usize, role: NodeRole) -> Self {
        // index is bounded by MAX_NODES, which keeps both port ranges within u16
        let offset = (index - 1) as u16;
        Self {
            index,
            role,
            data_dir: PathBuf::from(format!("node{index}")),
            p2p_port: P2P_PORT_BASE + offset,
            rpc_port: RPC_PORT_BASE + offset,
        }
    }

    /// Label used for logs and the process registry, e.g. `node3`.
    pub fn label(&self) -> String {
        format!("node{}", self.index)
    }

    /// Returns `true` if the node seals blocks.
    pub const fn is_authority(&self) -> bool {
        matches!(self.role, NodeRole::Authority)
    }

    /// Keystore directory, relative to the working area.
    pub fn keystore_dir(&self) -> PathBuf {
        self.data_dir.join("keystore")
    }

    /// File the node process writes its output to, relative to the working area.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("console.log")
    }

    /// IPC endpoint created by the node, relative to the working area.
    pub fn ipc_path(&self) -> PathBuf {
        self.data_dir.join("geth.ipc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BOOTNODE_PORT;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    #[test]
    fn rejects_missing_authority() {
        assert_matches!(NetworkTopology::new(0, 3), Err(TopologyError::NoAuthorities));
    }

    #[test]
    fn rejects_oversized_network() {
        assert!(NetworkTopology::new(1, MAX_NODES - 1).is_ok());
        assert_matches!(
            NetworkTopology::new(1, MAX_NODES),
            Err(TopologyError::TooManyNodes(n)) if n == MAX_NODES + 1
        );
        assert_matches!(
            NetworkTopology::new(usize::MAX, usize::MAX),
            Err(TopologyError::TooManyNodes(_))
        );
    }

    #[test]
    fn plans_roles_and_ports() {
        let topology = NetworkTopology::new(2, 1).unwrap();
        let specs = topology.node_specs();

        assert_eq!(specs.len(), 3);
        assert_eq!(
            specs.iter().map(|spec| spec.role).collect::<Vec<_>>(),
            vec![NodeRole::Authority, NodeRole::Authority, NodeRole::Peer]
        );
        assert_eq!(specs.iter().map(|s| s.p2p_port).collect::<Vec<_>>(), vec![30301, 30302, 30303]);
        assert_eq!(specs.iter().map(|s| s.rpc_port).collect::<Vec<_>>(), vec![8545, 8546, 8547]);
        assert_eq!(specs[2].data_dir, PathBuf::from("node3"));
        assert_eq!(specs[2].log_path(), PathBuf::from("node3/console.log"));
        assert_eq!(specs[0].keystore_dir(), PathBuf::from("node1/keystore"));
    }

    #[test]
    fn peer_count_may_be_zero() {
        let specs = NetworkTopology::new(1, 0).unwrap().node_specs();
        assert_eq!(specs.len(), 1);
        assert!(specs[0].is_authority());
        assert_eq!(specs[0].label(), "node1");
    }

    #[test]
    fn ports_are_pairwise_distinct() {
        for (authorities, peers) in [(1, 0), (3, 4), (7, 0), (1, 63)] {
            let specs = NetworkTopology::new(authorities, peers).unwrap().node_specs();
            assert_eq!(specs.len(), authorities + peers);

            let mut seen = HashSet::from([BOOTNODE_PORT]);
            for pair in specs.windows(2) {
                assert!(pair[0].p2p_port < pair[1].p2p_port);
                assert!(pair[0].rpc_port < pair[1].rpc_port);
            }
            for spec in &specs {
                assert!(seen.insert(spec.p2p_port), "duplicate port {}", spec.p2p_port);
                assert!(seen.insert(spec.rpc_port), "duplicate port {}", spec.rpc_port);
            }
        }
    }

    #[test]
    fn largest_network_stays_in_range() {
        let specs = NetworkTopology::new(1, MAX_NODES - 1).unwrap().node_specs();
        let last = specs.last().unwrap();
        assert_eq!(last.rpc_port, BOOTNODE_PORT - 1);
        assert_eq!(last.p2p_port as usize, P2P_PORT_BASE as usize + MAX_NODES - 1);
    }

    #[test]
    fn serializes_counts_only() {
        let topology = NetworkTopology::new(2, 1).unwrap();
        let json = serde_json::to_string(&topology).unwrap();
        assert_eq!(json, r#"{"authorities":2,"peers":1}"#);

        let decoded: NetworkTopology = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, topology);
    }

    #[test]
    fn deserialization_validates() {
        let err = serde_json::from_str::<NetworkTopology>(r#"{"authorities":0,"peers":1}"#);
        assert!(err.is_err());
    }
}
