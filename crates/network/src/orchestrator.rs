use crate::{
    geth::{GethCommands, BOOTNODE_LABEL},
    provisioner::NodeProvisioner,
    BootnodeKey, NetworkError, StateStore, WorkingArea,
};
use cliquenet_config::Config;
use cliquenet_genesis::GenesisBuilder;
use cliquenet_primitives::{
    constants::{BOOTNODE_HOST, BOOTNODE_PORT},
    NetworkParams, NetworkTopology, NodeSpec,
};
use cliquenet_supervisor::{
    CommandRunner, LaunchRequest, ProcessEntry, ProcessLauncher, ProcessRegistry,
};
use std::{path::PathBuf, time::Duration};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Interval at which the bootnode's liveness is checked during the readiness window.
const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A running network, as reported after create and restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSummary {
    /// The network's topology.
    pub topology: NetworkTopology,
    /// `enode://` URL of the bootnode.
    pub enode: String,
    /// The launched nodes in index order.
    pub nodes: Vec<NodeSpec>,
    /// Root of the working area.
    pub root: PathBuf,
}

impl NetworkSummary {
    /// IPC endpoint of `node`, for `geth attach`.
    pub fn ipc_path(&self, node: &NodeSpec) -> PathBuf {
        self.root.join(node.ipc_path())
    }
}

/// Drives the lifecycle of the network in one [`WorkingArea`].
///
/// ```text
/// Absent --create--> Running --stop--> Stopped --restart--> Running
///    ^                  |                 |
///    +-------------- delete --------------+
/// ```
///
/// External commands go through `R`, long running processes through `L`. Every launched process
/// is recorded in the area's [`ProcessRegistry`], which is the only way processes are selected
/// for termination.
#[derive(Debug)]
pub struct Orchestrator<R, L> {
    area: WorkingArea,
    runner: R,
    launcher: L,
    commands: GethCommands,
    bootnode_readiness: Duration,
}

impl<R, L> Orchestrator<R, L>
where
    R: CommandRunner,
    L: ProcessLauncher,
{
    /// Creates an orchestrator for `area`.
    pub fn new(area: WorkingArea, runner: R, launcher: L, config: &Config) -> Self {
        let commands = GethCommands::new(config, area.root());
        Self {
            area,
            runner,
            launcher,
            commands,
            bootnode_readiness: config.supervisor.bootnode_readiness,
        }
    }

    /// The working area.
    pub const fn area(&self) -> &WorkingArea {
        &self.area
    }

    /// The process launcher.
    pub const fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Creates a new network from scratch and starts it.
    ///
    /// Processes of a previous network in the area are terminated and the area is wiped. A
    /// failure leaves the area partially provisioned, [`Orchestrator::delete`] cleans it up.
    pub async fn create(&self, params: &NetworkParams) -> Result<NetworkSummary, NetworkError> {
        self.stop_previous();
        self.area.reset()?;

        let topology = params.topology();
        let nodes = topology.node_specs();
        info!(
            target: "cliquenet::orchestrator",
            authorities = topology.authorities(),
            peers = topology.peers(),
            block_time = params.block_time(),
            root = ?self.area.root(),
            "Creating network"
        );

        for node in &nodes {
            cliquenet_fs_util::create_dir_all(self.area.resolve(&node.data_dir))?;
        }
        cliquenet_fs_util::write_private(self.area.password_path(), params.password())?;

        let provisioner = NodeProvisioner::new(&self.runner, &self.area, &self.commands);
        let authorities = provisioner.generate_accounts(&nodes).await?;

        let genesis = GenesisBuilder::new(params.block_time())
            .signers(authorities.iter().copied())
            .prefund(authorities)
            .build()?;
        cliquenet_fs_util::write(self.area.genesis_path(), genesis.to_json()?)?;

        provisioner.init_nodes(&nodes).await?;

        let key = BootnodeKey::load_or_generate(&self.area.boot_key_path())?;
        StateStore::new(&self.area).save(&topology)?;

        self.start(topology, &key).await
    }

    /// Terminates the network's processes and removes the working area.
    ///
    /// Succeeds if there is nothing to delete. Returns `false` in that case.
    pub fn delete(&self) -> Result<bool, NetworkError> {
        self.stop_previous();
        let removed = self.area.remove()?;
        if removed {
            info!(target: "cliquenet::orchestrator", root = ?self.area.root(), "Deleted network");
        }
        Ok(removed)
    }

    /// Terminates the recorded processes. Persisted state and node data stay untouched.
    ///
    /// Returns the number of processes that were still running.
    pub fn stop(&self) -> Result<usize, NetworkError> {
        if !self.area.exists() {
            return Ok(0)
        }

        let path = self.area.registry_path();
        let mut registry = ProcessRegistry::load(&path)?;
        if registry.is_empty() {
            return Ok(0)
        }

        let stopped = registry.terminate_all(&self.launcher);
        registry.store(&path)?;
        info!(target: "cliquenet::orchestrator", stopped, "Stopped network");
        Ok(stopped)
    }

    /// Restarts a previously created network without provisioning it again.
    ///
    /// Fails with [`StateError::NotFound`](crate::StateError::NotFound) if no network was
    /// created in the area.
    pub async fn restart(&self) -> Result<NetworkSummary, NetworkError> {
        self.stop_previous();
        let topology = StateStore::new(&self.area).load()?;
        let key = BootnodeKey::load(&self.area.boot_key_path())?;
        info!(
            target: "cliquenet::orchestrator",
            authorities = topology.authorities(),
            peers = topology.peers(),
            "Restarting network"
        );
        self.start(topology, &key).await
    }

    /// Best effort [`Orchestrator::stop`] ahead of create, restart and delete. An unreadable
    /// registry is logged and otherwise ignored, the following start writes a new one.
    fn stop_previous(&self) {
        if let Err(err) = self.stop() {
            warn!(target: "cliquenet::orchestrator", %err, "Failed to stop previous processes");
        }
    }

    /// Launches the bootnode, then every node in index order.
    async fn start(
        &self,
        topology: NetworkTopology,
        key: &BootnodeKey,
    ) -> Result<NetworkSummary, NetworkError> {
        // keeps processes a previous stop failed to terminate, a broken file is replaced
        let mut registry =
            ProcessRegistry::load(&self.area.registry_path()).unwrap_or_default();

        let bootnode = self.launch(&mut registry, self.commands.bootnode())?;
        self.await_bootnode(bootnode).await?;

        let enode = key.enode(BOOTNODE_HOST, BOOTNODE_PORT);
        let nodes = topology.node_specs();
        for node in &nodes {
            self.launch(&mut registry, self.commands.node(node, &enode))?;
        }

        info!(
            target: "cliquenet::orchestrator",
            authorities = topology.authorities(),
            peers = topology.peers(),
            "Network started"
        );
        Ok(NetworkSummary { topology, enode, nodes, root: self.area.root().to_path_buf() })
    }

    /// Launches a process and records it right away, so a failure later on doesn't leave
    /// untracked processes behind.
    fn launch(
        &self,
        registry: &mut ProcessRegistry,
        request: LaunchRequest,
    ) -> Result<u32, NetworkError> {
        let pid = self.launcher.launch(&request)?;
        registry.push(ProcessEntry { label: request.label, program: request.program, pid });
        registry.store(&self.area.registry_path())?;
        Ok(pid)
    }

    /// Fails if the bootnode exits within the readiness window. A zero window skips the check.
    async fn await_bootnode(&self, pid: u32) -> Result<(), NetworkError> {
        if self.bootnode_readiness.is_zero() {
            return Ok(())
        }
        debug!(target: "cliquenet::orchestrator", label = BOOTNODE_LABEL, pid, window = ?self.bootnode_readiness, "Waiting for bootnode");

        let deadline = Instant::now() + self.bootnode_readiness;
        loop {
            if !self.launcher.is_running(pid) {
                return Err(NetworkError::BootnodeExited { pid, port: BOOTNODE_PORT })
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(())
            }
            tokio::time::sleep(READINESS_POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
