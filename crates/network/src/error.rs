use cliquenet_fs_util::FsPathError;
use cliquenet_genesis::GenesisError;
use cliquenet_supervisor::{CommandError, SupervisorError};
use std::path::PathBuf;

/// Errors of the persisted network state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No network was created in the working area.
    #[error("no network state at {0:?}, create a network first")]
    NotFound(PathBuf),
    /// The state file exists but does not describe a valid network.
    #[error("network state at {path:?} is malformed: {source}")]
    Malformed {
        /// The state file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Any other filesystem error.
    #[error(transparent)]
    Fs(#[from] FsPathError),
}

impl StateError {
    /// Returns `true` if there is no usable state, i.e. restart has nothing to resume.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Malformed { .. })
    }
}

/// Errors raised while provisioning node directories.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// An external command failed.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// Account generation succeeded but left no keystore file behind.
    #[error("no account was generated in {dir:?}")]
    MissingKeystore {
        /// The keystore directory.
        dir: PathBuf,
    },
    /// More than one account exists where exactly one was generated.
    #[error("expected exactly one account in {dir:?}, found {count}")]
    AmbiguousKeystore {
        /// The keystore directory.
        dir: PathBuf,
        /// Number of keystore files.
        count: usize,
    },
    /// The keystore file does not carry a valid address.
    #[error("keystore file {path:?} is malformed: {source}")]
    MalformedKeystore {
        /// The keystore file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Filesystem error.
    #[error(transparent)]
    Fs(#[from] FsPathError),
}

/// Errors of the bootnode key file.
#[derive(Debug, thiserror::Error)]
pub enum BootnodeKeyError {
    /// The key file does not hold a hex encoded secp256k1 secret key.
    #[error("invalid bootnode key in {path:?}: {source}")]
    Decode {
        /// The key file.
        path: PathBuf,
        /// The decode error.
        #[source]
        source: secp256k1::Error,
    },
    /// Filesystem error.
    #[error(transparent)]
    Fs(#[from] FsPathError),
}

/// Errors of the network lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Provisioning failed, the working area is left as is.
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    /// Genesis construction failed.
    #[error(transparent)]
    Genesis(#[from] GenesisError),
    /// Persisted state is missing or unusable.
    #[error(transparent)]
    State(#[from] StateError),
    /// Bootnode key failure.
    #[error(transparent)]
    BootnodeKey(#[from] BootnodeKeyError),
    /// Process launch or termination failed.
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
    /// The bootnode exited before the nodes were launched.
    #[error("bootnode (pid {pid}) exited right after start, is port {port} in use?")]
    BootnodeExited {
        /// Pid of the bootnode.
        pid: u32,
        /// Port the bootnode tried to listen on.
        port: u16,
    },
    /// Filesystem error.
    #[error(transparent)]
    Fs(#[from] FsPathError),
}
