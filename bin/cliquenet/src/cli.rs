//! CLI definition and entrypoint to executable

use crate::{
    args::{LogArgs, NewArgs},
    prompt::Prompter,
};
use clap::{Parser, Subcommand};
use cliquenet_config::Config;
use cliquenet_network::{NetworkSummary, Orchestrator, WorkingArea};
use cliquenet_primitives::constants::RPC_HOST;
use cliquenet_supervisor::{DetachedLauncher, SystemCommandRunner};
use cliquenet_tracing::tracing::info;
use eyre::WrapErr;
use std::{
    io::{self, Write},
    path::PathBuf,
};

/// Bootstraps and operates a local clique proof-of-authority network.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding all artifacts of the network.
    #[arg(long, value_name = "PATH", global = true, default_value = "output")]
    pub datadir: PathBuf,

    /// The path to the configuration file to use.
    ///
    /// Defaults are used if not set. A missing file is created with the defaults.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Logging options.
    #[command(flatten)]
    pub logs: LogArgs,
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create new network
    #[command(name = "new", visible_alias = "n")]
    New(NewArgs),
    /// Delete network
    #[command(name = "delete", visible_alias = "d")]
    Delete,
    /// Stop network
    #[command(name = "stop", visible_alias = "s")]
    Stop,
    /// Restart network
    #[command(name = "restart", visible_alias = "r")]
    Restart,
}

impl Cli {
    /// Sets up logging and runs the chosen command.
    pub async fn run(self) -> eyre::Result<()> {
        let _guard = self.logs.init_tracing()?;

        let config = self.load_config()?;
        info!(target: "cliquenet::cli", datadir = ?self.datadir, "Using working area");

        let orchestrator = Orchestrator::new(
            WorkingArea::new(&self.datadir),
            SystemCommandRunner::new(config.supervisor.command_timeout),
            DetachedLauncher::new(),
            &config,
        );
        let mut stdout = io::stdout();

        match self.command {
            Commands::New(args) => {
                let params = {
                    let stdin = io::stdin();
                    args.network_params(&mut Prompter::new(stdin.lock(), &mut stdout))?
                };
                let summary =
                    orchestrator.create(&params).await.wrap_err("Failed to create network")?;
                print_summary(&mut stdout, &summary)?;
            }
            Commands::Delete => {
                orchestrator.delete().wrap_err("Failed to delete network")?;
                writeln!(stdout, "Network deleted successfully.")?;
            }
            Commands::Stop => {
                orchestrator.stop().wrap_err("Failed to stop network")?;
                writeln!(stdout, "Network stopped successfully.")?;
            }
            Commands::Restart => {
                let summary =
                    orchestrator.restart().await.wrap_err("Failed to restart network")?;
                writeln!(stdout, "Network restarted successfully.")?;
                print_summary(&mut stdout, &summary)?;
            }
        }

        Ok(())
    }

    fn load_config(&self) -> eyre::Result<Config> {
        match &self.config {
            Some(path) => Config::from_path(path)
                .wrap_err_with(|| format!("Could not load config file {path:?}")),
            None => Ok(Config::default()),
        }
    }
}

/// Prints how to reach every node of the network.
fn print_summary(out: &mut impl Write, summary: &NetworkSummary) -> io::Result<()> {
    writeln!(
        out,
        "Successfully started the network with {} authority and {} peer nodes. Here are commands to connect to running nodes:",
        summary.topology.authorities(),
        summary.topology.peers()
    )?;
    writeln!(out)?;
    for node in &summary.nodes {
        writeln!(out, "Node {} ({}):", node.index, node.role)?;
        writeln!(out, " IPC Attach: geth attach {}", summary.ipc_path(node).display())?;
        writeln!(out, " RPC Endpoint: {RPC_HOST}:{}", node.rpc_port)?;
    }
    Ok(())
}
