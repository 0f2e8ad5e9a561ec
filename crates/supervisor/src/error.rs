use cliquenet_fs_util::FsPathError;
use std::{io, time::Duration};

/// Errors of an awaited external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The executable could not be started.
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        /// The command line.
        command: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The command ran and exited unsuccessfully.
    #[error("`{command}` failed with exit code {code:?}")]
    ExitStatus {
        /// The command line.
        command: String,
        /// Exit code, `None` if the process was terminated by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
    /// The command did not finish in time and was killed.
    #[error("`{command}` did not finish within {timeout:?}")]
    Timeout {
        /// The command line.
        command: String,
        /// The configured bound.
        timeout: Duration,
    },
}

/// Errors of detached process supervision.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The process could not be started.
    #[error("failed to launch {label} (`{program}`): {source}")]
    Spawn {
        /// Label of the process.
        label: String,
        /// The executable.
        program: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// Sending the termination signal failed for a reason other than the process being gone.
    #[error("failed to terminate process group {pid}: {source}")]
    Signal {
        /// Leader of the process group.
        pid: u32,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// Log file or registry access failed.
    #[error(transparent)]
    Fs(#[from] FsPathError),
}
