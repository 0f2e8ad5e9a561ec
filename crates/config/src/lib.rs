//! Standalone crate for cliquenet configuration types.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

pub use confy::ConfyError;

/// Configuration for the orchestrator.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Config {
    /// External executables.
    pub binaries: BinariesConfig,
    /// Process supervision.
    pub supervisor: SupervisorConfig,
}

impl Config {
    /// Loads the configuration from a TOML file.
    ///
    /// A missing file is created with the default values.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfyError> {
        confy::load_path(path.as_ref())
    }
}

/// Names or paths of the external executables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct BinariesConfig {
    /// The geth client, used for account generation, chain init and running nodes.
    pub geth: String,
    /// The discovery-only bootnode.
    pub bootnode: String,
}

impl Default for BinariesConfig {
    fn default() -> Self {
        Self { geth: "geth".to_string(), bootnode: "bootnode".to_string() }
    }
}

/// Process supervision configuration.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Upper bound on every awaited external command. Zero disables the bound.
    #[serde(with = "humantime_serde")]
    pub command_timeout: Duration,
    /// How long the bootnode has to stay alive before the nodes are launched. Zero skips the
    /// check.
    #[serde(with = "humantime_serde")]
    pub bootnode_readiness: Duration,
    /// `--verbosity` passed to every node.
    pub node_verbosity: u8,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            // 5min
            command_timeout: Duration::from_secs(5 * 60),
            bootnode_readiness: Duration::from_secs(1),
            node_verbosity: 2,
        }
    }
}
