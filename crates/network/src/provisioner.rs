use crate::{geth::GethCommands, ProvisionError, WorkingArea};
use alloy_primitives::Address;
use cliquenet_primitives::NodeSpec;
use cliquenet_supervisor::CommandRunner;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// The part of a geth keystore file that is read back.
#[derive(Deserialize)]
struct KeystoreFile {
    /// Hex, without `0x` prefix.
    address: Address,
}

/// Provisions node directories through external commands.
///
/// Every step is awaited before the next one starts; the first failure aborts and leaves what was
/// created so far in place.
#[derive(Debug)]
pub(crate) struct NodeProvisioner<'a, R: ?Sized> {
    runner: &'a R,
    area: &'a WorkingArea,
    commands: &'a GethCommands,
}

impl<'a, R> NodeProvisioner<'a, R>
where
    R: CommandRunner + ?Sized,
{
    pub(crate) const fn new(
        runner: &'a R,
        area: &'a WorkingArea,
        commands: &'a GethCommands,
    ) -> Self {
        Self { runner, area, commands }
    }

    /// Generates the account of every authority, in index order.
    ///
    /// Returns the addresses in generation order.
    pub(crate) async fn generate_accounts(
        &self,
        nodes: &[NodeSpec],
    ) -> Result<Vec<Address>, ProvisionError> {
        let mut addresses = Vec::new();
        for node in nodes.iter().filter(|node| node.is_authority()) {
            addresses.push(self.generate_account(node).await?);
        }
        Ok(addresses)
    }

    /// Generates the account of one node and reads back its address.
    pub(crate) async fn generate_account(&self, node: &NodeSpec) -> Result<Address, ProvisionError> {
        self.runner.run(&self.commands.account_new(node)).await?;
        let address = read_keystore_address(&self.area.resolve(node.keystore_dir()))?;
        info!(target: "cliquenet::provision", node = %node.label(), %address, "Generated account");
        Ok(address)
    }

    /// Initializes every node's chain data with the genesis document, in index order.
    pub(crate) async fn init_nodes(&self, nodes: &[NodeSpec]) -> Result<(), ProvisionError> {
        for node in nodes {
            self.init_node(node).await?;
        }
        Ok(())
    }

    /// Initializes one node's chain data with the genesis document.
    pub(crate) async fn init_node(&self, node: &NodeSpec) -> Result<(), ProvisionError> {
        self.runner.run(&self.commands.init(node)).await?;
        info!(target: "cliquenet::provision", node = %node.label(), "Initialized chain data");
        Ok(())
    }
}

/// Reads the address of the only account in `dir`.
fn read_keystore_address(dir: &Path) -> Result<Address, ProvisionError> {
    let files = match cliquenet_fs_util::list_files(dir) {
        Ok(files) => files,
        Err(err) if err.is_not_found() => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    match files.as_slice() {
        [] => Err(ProvisionError::MissingKeystore { dir: dir.to_path_buf() }),
        [path] => {
            let contents = cliquenet_fs_util::read_to_string(path)?;
            let keystore: KeystoreFile = serde_json::from_str(&contents)
                .map_err(|source| ProvisionError::MalformedKeystore { path: path.clone(), source })?;
            Ok(keystore.address)
        }
        _ => Err(ProvisionError::AmbiguousKeystore { dir: dir.to_path_buf(), count: files.len() }),
    }
}
