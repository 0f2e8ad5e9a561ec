//! Command line arguments.

use crate::prompt::Prompter;
use clap::{ArgAction, Args};
use cliquenet_primitives::NetworkParams;
use cliquenet_tracing::{
    tracing::{level_filters::LevelFilter, Level},
    tracing_subscriber::filter::Directive,
    CliquenetTracer, FileInfo, FileWorkerGuard, LayerInfo, LogFormat, Tracer,
};
use eyre::WrapErr;
use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

/// Authority nodes proposed when not given.
pub const DEFAULT_AUTHORITIES: usize = 2;
/// Peer nodes proposed when not given.
pub const DEFAULT_PEERS: usize = 1;
/// Account password proposed when not given.
pub const DEFAULT_PASSWORD: &str = "Password@123";
/// Block time proposed when not given.
pub const DEFAULT_BLOCK_TIME: u64 = 5;

/// Parameters of a new network. Values that are not given are asked for interactively.
#[derive(Debug, Clone, Default, Args)]
pub struct NewArgs {
    /// Number of authority nodes, sealing blocks.
    #[arg(long, value_name = "COUNT")]
    pub authorities: Option<usize>,

    /// Number of peer nodes, following the chain.
    #[arg(long, value_name = "COUNT")]
    pub peers: Option<usize>,

    /// Password of the authority accounts.
    #[arg(long)]
    pub password: Option<String>,

    /// Seconds between two blocks.
    #[arg(long, value_name = "SECONDS")]
    pub block_time: Option<u64>,
}

impl NewArgs {
    /// Resolves the network parameters, prompting for every missing value.
    pub fn network_params<R, W>(self, prompter: &mut Prompter<R, W>) -> eyre::Result<NetworkParams>
    where
        R: BufRead,
        W: Write,
    {
        let authorities = match self.authorities {
            Some(authorities) => authorities,
            None => prompter.ask("Enter total authority nodes", DEFAULT_AUTHORITIES, |n| {
                (*n > 0).then_some(()).ok_or("at least 1 authority node is required")
            })?,
        };
        let peers = match self.peers {
            Some(peers) => peers,
            None => prompter.ask("Enter total peer nodes", DEFAULT_PEERS, |_| Ok(()))?,
        };
        let password = match self.password {
            Some(password) => password,
            None => prompter.ask(
                "Enter password for ethereum accounts",
                DEFAULT_PASSWORD.to_string(),
                |_| Ok(()),
            )?,
        };
        let block_time = match self.block_time {
            Some(block_time) => block_time,
            None => prompter.ask("Enter block time", DEFAULT_BLOCK_TIME, |n| {
                (*n > 0).then_some(()).ok_or("block time should be more than 0")
            })?,
        };

        NetworkParams::new(authorities, peers, block_time, password)
            .wrap_err("Invalid network parameters")
    }
}

/// The log configuration.
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Logging")]
pub struct LogArgs {
    /// The format to use for logs written to stdout.
    #[arg(long = "log.stdout.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub log_stdout_format: LogFormat,

    /// The filter to use for logs written to stdout.
    #[arg(long = "log.stdout.filter", value_name = "FILTER", global = true, default_value = "")]
    pub log_stdout_filter: String,

    /// The path to put log files in. File logging is disabled if not set.
    #[arg(long = "log.file.directory", value_name = "PATH", global = true)]
    pub log_file_directory: Option<PathBuf>,

    /// The filter to use for logs written to the log file.
    #[arg(long = "log.file.filter", value_name = "FILTER", global = true, default_value = "debug")]
    pub log_file_filter: String,

    /// The format to use for logs written to the log file.
    #[arg(long = "log.file.format", value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub log_file_format: LogFormat,

    /// Sets whether or not the formatter emits ANSI terminal escape codes for colors and other
    /// text formatting.
    #[arg(long, value_name = "COLOR", global = true, default_value = "always")]
    pub color: String,

    /// The verbosity settings for the tracer.
    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl LogArgs {
    /// Initializes tracing with the configured options.
    ///
    /// If file logging is enabled, this function returns a guard that must be kept alive to ensure
    /// that all logs are flushed to disk.
    pub fn init_tracing(&self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut tracer = CliquenetTracer::new().with_stdout(LayerInfo::new(
            self.log_stdout_format,
            self.verbosity.directive().to_string(),
            self.log_stdout_filter.clone(),
            Some(self.color.clone()),
        ));

        if let Some(directory) = &self.log_file_directory {
            tracer = tracer.with_file(
                LayerInfo::new(
                    self.log_file_format,
                    LevelFilter::DEBUG.to_string(),
                    self.log_file_filter.clone(),
                    None,
                ),
                FileInfo::new(directory, "cliquenet.log"),
            );
        }

        tracer.init()
    }
}

/// The verbosity settings for the cli.
#[derive(Debug, Copy, Clone, Args)]
#[command(next_help_heading = "Display")]
pub struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v      Errors
    /// -vv     Warnings
    /// -vvv    Info
    /// -vvvv   Debug
    /// -vvvvv  Traces (warning: very verbose!)
    #[arg(short, long, action = ArgAction::Count, global = true, default_value_t = 3, verbatim_doc_comment, help_heading = "Display")]
    verbosity: u8,

    /// Silence all log output.
    #[arg(long, alias = "silent", short = 'q', global = true, help_heading = "Display")]
    quiet: bool,
}

impl Verbosity {
    /// Get the corresponding [Directive] for the given verbosity, or none if the verbosity
    /// corresponds to silent.
    pub fn directive(&self) -> Directive {
        if self.quiet {
            LevelFilter::OFF.into()
        } else {
            let level = match self.verbosity.saturating_sub(1) {
                0 => Level::ERROR,
                1 => Level::WARN,
                2 => Level::INFO,
                3 => Level::DEBUG,
                _ => Level::TRACE,
            };

            LevelFilter::from_level(level).into()
        }
    }
}
