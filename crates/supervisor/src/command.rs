use crate::CommandError;
use async_trait::async_trait;
use std::{fmt, path::PathBuf, process::Stdio, time::Duration};
use tokio::process::Command;
use tracing::{debug, error};

/// An external command that is run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The executable.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Working directory of the command.
    pub current_dir: PathBuf,
}

impl Invocation {
    /// Creates an invocation of `program` without arguments.
    pub fn new(program: impl Into<String>, current_dir: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), current_dir: current_dir.into() }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

/// Runs external commands and awaits their completion.
///
/// A non zero exit is an error. Implementations must not return before the command finished.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError>;
}

/// [`CommandRunner`] spawning real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner {
    timeout: Option<Duration>,
}

impl SystemCommandRunner {
    /// Creates a runner killing commands that run longer than `timeout`.
    ///
    /// A zero timeout waits indefinitely.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout: (!timeout.is_zero()).then_some(timeout) }
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        let command = invocation.to_string();
        debug!(target: "cliquenet::supervisor", %command, dir = ?invocation.current_dir, "Running command");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .stdin(Stdio::null())
            // a timed out command is killed when the output future is dropped
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| CommandError::Timeout { command: command.clone(), timeout })?,
            None => cmd.output().await,
        }
        .map_err(|source| CommandError::Spawn { command: command.clone(), source })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        for line in stdout.lines().chain(stderr.lines()) {
            debug!(target: "cliquenet::supervisor", "[{}] {}", invocation.program, line);
        }

        if !output.status.success() {
            error!(
                target: "cliquenet::supervisor",
                %command,
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            for line in stderr.lines() {
                error!(target: "cliquenet::supervisor", "  {}", line);
            }
            return Err(CommandError::ExitStatus { command, code: output.status.code(), stderr })
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
