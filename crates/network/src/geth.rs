//! Command lines of the external `geth` and `bootnode` executables.

use crate::working_area::{BOOT_KEY_FILE, GENESIS_FILE, PASSWORD_FILE};
use cliquenet_config::Config;
use cliquenet_primitives::{
    constants::{BOOTNODE_PORT, CHAIN_ID, GAS_PRICE, RPC_APIS, RPC_HOST},
    NodeSpec,
};
use cliquenet_supervisor::{Invocation, LaunchRequest};
use std::path::PathBuf;

/// Label of the bootnode in logs and the process registry.
pub(crate) const BOOTNODE_LABEL: &str = "bootnode";

/// Builds the external command lines of a network rooted in one working area.
#[derive(Debug, Clone)]
pub(crate) struct GethCommands {
    geth: String,
    bootnode: String,
    verbosity: u8,
    root: PathBuf,
}

impl GethCommands {
    pub(crate) fn new(config: &Config, root: impl Into<PathBuf>) -> Self {
        Self {
            geth: config.binaries.geth.clone(),
            bootnode: config.binaries.bootnode.clone(),
            verbosity: config.supervisor.node_verbosity,
            root: root.into(),
        }
    }

    /// `geth --datadir node{i}/ account new --password password.txt`
    pub(crate) fn account_new(&self, node: &NodeSpec) -> Invocation {
        Invocation::new(&self.geth, &self.root)
            .args(["--datadir".to_string(), datadir(node)])
            .args(["account", "new", "--password", PASSWORD_FILE])
    }

    /// `geth --datadir node{i}/ init genesis.json`
    pub(crate) fn init(&self, node: &NodeSpec) -> Invocation {
        Invocation::new(&self.geth, &self.root)
            .args(["--datadir".to_string(), datadir(node)])
            .args(["init", GENESIS_FILE])
    }

    /// Discovery-only bootnode listening on [`BOOTNODE_PORT`]. Its output is discarded.
    pub(crate) fn bootnode(&self) -> LaunchRequest {
        LaunchRequest {
            label: BOOTNODE_LABEL.to_string(),
            program: self.bootnode.clone(),
            args: vec![
                "-nodekey".to_string(),
                BOOT_KEY_FILE.to_string(),
                "-addr".to_string(),
                format!(":{BOOTNODE_PORT}"),
            ],
            current_dir: self.root.clone(),
            log_path: None,
        }
    }

    /// A node joining the network through `enode`. Authorities unlock their account and mine.
    pub(crate) fn node(&self, node: &NodeSpec, enode: &str) -> LaunchRequest {
        let mut args = vec![
            "--datadir".to_string(),
            datadir(node),
            "--syncmode".to_string(),
            "full".to_string(),
            "--port".to_string(),
            node.p2p_port.to_string(),
            "--rpc".to_string(),
            "--rpcaddr".to_string(),
            RPC_HOST.to_string(),
            "--rpcport".to_string(),
            node.rpc_port.to_string(),
            "--rpcapi".to_string(),
            RPC_APIS.to_string(),
            "--bootnodes".to_string(),
            enode.to_string(),
            "--networkid".to_string(),
            CHAIN_ID.to_string(),
            "--gasprice".to_string(),
            GAS_PRICE.to_string(),
            "--verbosity".to_string(),
            self.verbosity.to_string(),
        ];
        if node.is_authority() {
            args.extend(
                ["--unlock", "0", "--password", PASSWORD_FILE, "--mine", "--allow-insecure-unlock"]
                    .map(String::from),
            );
        }

        LaunchRequest {
            label: node.label(),
            program: self.geth.clone(),
            args,
            current_dir: self.root.clone(),
            log_path: Some(node.log_path()),
        }
    }
}

/// `node{i}/`, relative to the working area.
fn datadir(node: &NodeSpec) -> String {
    format!("{}/", node.data_dir.display())
}
