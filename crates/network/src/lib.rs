//! Provisioning and lifecycle management of a local clique network.
//!
//! The [`Orchestrator`] composes the pieces of a network living in one [`WorkingArea`]:
//!
//! - node accounts and chain data, provisioned through `geth`
//! - the genesis document, see [`cliquenet_genesis`]
//! - the [`BootnodeKey`] every node discovers its peers through
//! - the persisted topology, see [`StateStore`]
//! - the processes of the bootnode and the nodes, see [`cliquenet_supervisor`]

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod bootnode;
mod error;
mod geth;
mod orchestrator;
mod provisioner;
mod state;
mod working_area;

#[cfg(test)]
mod test_utils;

pub use bootnode::BootnodeKey;
pub use error::{BootnodeKeyError, NetworkError, ProvisionError, StateError};
pub use orchestrator::{NetworkSummary, Orchestrator};
pub use state::StateStore;
pub use working_area::{
    WorkingArea, BOOT_KEY_FILE, GENESIS_FILE, PASSWORD_FILE, REGISTRY_FILE, STATE_FILE,
};
