use crate::{ProcessLauncher, SupervisorError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A process started by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    /// Label of the process, e.g. `bootnode` or `node2`.
    pub label: String,
    /// The executable.
    pub program: String,
    /// Process id, which is also the id of the process group it leads.
    pub pid: u32,
}

/// Ordered record of the processes launched for a network.
///
/// Persisted so a later invocation terminates exactly these processes and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessRegistry {
    entries: Vec<ProcessEntry>,
}

impl ProcessRegistry {
    /// Reads the registry at `path`. A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self, SupervisorError> {
        match cliquenet_fs_util::read_json_file(path) {
            Ok(registry) => Ok(registry),
            Err(err) if err.is_not_found() => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes the registry to `path`, replacing previous content.
    pub fn store(&self, path: &Path) -> Result<(), SupervisorError> {
        Ok(cliquenet_fs_util::write_json_file(path, self)?)
    }

    /// Records a launched process.
    pub fn push(&mut self, entry: ProcessEntry) {
        self.entries.push(entry);
    }

    /// Recorded processes in launch order.
    pub fn entries(&self) -> &[ProcessEntry] {
        &self.entries
    }

    /// Returns `true` if no process is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Terminates every recorded process, most recently launched first.
    ///
    /// Best effort: processes that already exited, or whose id now belongs to another
    /// executable, are skipped and forgotten. Processes that could not be signalled are logged
    /// and stay recorded. Returns the number of processes that were signalled.
    pub fn terminate_all<L>(&mut self, launcher: &L) -> usize
    where
        L: ProcessLauncher + ?Sized,
    {
        let mut signalled = 0;
        let mut failed = Vec::new();
        for entry in std::mem::take(&mut self.entries).into_iter().rev() {
            if !launcher.is_instance_of(entry.pid, &entry.program) {
                warn!(target: "cliquenet::supervisor", label = %entry.label, pid = entry.pid, program = %entry.program, "Process id belongs to another executable, skipping");
                continue
            }
            match launcher.terminate(entry.pid) {
                Ok(true) => signalled += 1,
                Ok(false) => {
                    debug!(target: "cliquenet::supervisor", label = %entry.label, pid = entry.pid, "Process not running")
                }
                Err(err) => {
                    warn!(target: "cliquenet::supervisor", label = %entry.label, pid = entry.pid, %err, "Failed to terminate process");
                    failed.push(entry);
                }
            }
        }
        failed.reverse();
        self.entries = failed;
        signalled
    }
}
