use cliquenet_fs_util::FsPathError;
use std::path::{Path, PathBuf};

/// Genesis document, consumed by every `geth init`.
pub const GENESIS_FILE: &str = "genesis.json";
/// Hex encoded secret key of the bootnode.
pub const BOOT_KEY_FILE: &str = "boot.key";
/// Plaintext password unlocking the authority accounts.
pub const PASSWORD_FILE: &str = "password.txt";
/// Persisted [`NetworkTopology`](cliquenet_primitives::NetworkTopology).
pub const STATE_FILE: &str = "network-config.json";
/// Persisted [`ProcessRegistry`](cliquenet_supervisor::ProcessRegistry).
pub const REGISTRY_FILE: &str = "processes.json";

/// The directory holding every artifact of one network.
///
/// All external commands run with the root as working directory and address files relative to
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingArea {
    root: PathBuf,
}

impl WorkingArea {
    /// Creates a handle for the area at `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The area's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` if the root directory exists.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Joins a path relative to the root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Path of the genesis document.
    pub fn genesis_path(&self) -> PathBuf {
        self.resolve(GENESIS_FILE)
    }

    /// Path of the bootnode key.
    pub fn boot_key_path(&self) -> PathBuf {
        self.resolve(BOOT_KEY_FILE)
    }

    /// Path of the password file.
    pub fn password_path(&self) -> PathBuf {
        self.resolve(PASSWORD_FILE)
    }

    /// Path of the persisted topology.
    pub fn state_path(&self) -> PathBuf {
        self.resolve(STATE_FILE)
    }

    /// Path of the persisted process registry.
    pub fn registry_path(&self) -> PathBuf {
        self.resolve(REGISTRY_FILE)
    }

    /// Wipes the area and recreates it empty.
    pub fn reset(&self) -> Result<(), FsPathError> {
        self.remove()?;
        cliquenet_fs_util::create_dir_all(&self.root)
    }

    /// Removes the area with all its content.
    ///
    /// Returns `false` if there was nothing to remove.
    pub fn remove(&self) -> Result<bool, FsPathError> {
        match cliquenet_fs_util::remove_dir_all(&self.root) {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
