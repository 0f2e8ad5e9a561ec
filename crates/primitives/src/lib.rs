//! Commonly used types and constants of a cliquenet network.
//!
//! A network is described by its [`NetworkTopology`], the only piece of state that is persisted
//! between invocations. Everything else, node directories and ports included, is derived from it.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;
mod params;
mod topology;

pub use params::{NetworkParams, ParamsError};
pub use topology::{NetworkTopology, NodeRole, NodeSpec, TopologyError};
