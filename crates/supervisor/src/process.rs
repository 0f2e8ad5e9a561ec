use crate::SupervisorError;
use cliquenet_fs_util::FsPathError;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    path::PathBuf,
    process::{Child, Command, Stdio},
};
use tracing::{debug, info};

/// A long running process to start in the background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Label used in logs and the process registry.
    pub label: String,
    /// The executable.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Working directory of the process.
    pub current_dir: PathBuf,
    /// File, relative to `current_dir`, that stdout and stderr are appended to. `None` discards
    /// the output.
    pub log_path: Option<PathBuf>,
}

/// Starts processes that outlive the caller and terminates them by identifier.
pub trait ProcessLauncher: Send + Sync {
    /// Starts the process and returns its pid without waiting for any readiness.
    fn launch(&self, request: &LaunchRequest) -> Result<u32, SupervisorError>;

    /// Returns `true` if the process is still alive.
    fn is_running(&self, pid: u32) -> bool;

    /// Terminates the process group led by `pid`.
    ///
    /// Returns `false` if no such process exists anymore.
    fn terminate(&self, pid: u32) -> Result<bool, SupervisorError>;

    /// Returns `false` if `pid` is known to run an executable other than `program`, which happens
    /// when the id was reused after the recorded process exited.
    ///
    /// Launchers that can't tell return `true`.
    fn is_instance_of(&self, pid: u32, program: &str) -> bool {
        let _ = (pid, program);
        true
    }
}

/// [`ProcessLauncher`] starting each process as the leader of a new process group.
///
/// Detached processes don't receive the terminal's signals and keep running after this process
/// exits.
#[derive(Debug, Default)]
pub struct DetachedLauncher {
    /// Processes launched by this instance, kept to observe their exit.
    children: Mutex<HashMap<u32, Child>>,
}

impl DetachedLauncher {
    /// Creates a launcher that has not started anything yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessLauncher for DetachedLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<u32, SupervisorError> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args).current_dir(&request.current_dir).stdin(Stdio::null());

        if let Some(log_path) = &request.log_path {
            let path = request.current_dir.join(log_path);
            let stdout = cliquenet_fs_util::open_append(&path)?;
            let stderr = stdout.try_clone().map_err(|err| FsPathError::open(err, &path))?;
            cmd.stdout(stdout).stderr(stderr);
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        debug!(target: "cliquenet::supervisor", label = %request.label, "Executing command: {cmd:?}");

        let child = cmd.spawn().map_err(|source| SupervisorError::Spawn {
            label: request.label.clone(),
            program: request.program.clone(),
            source,
        })?;
        let pid = child.id();
        info!(target: "cliquenet::supervisor", label = %request.label, pid, "Process started");

        self.children.lock().insert(pid, child);
        Ok(pid)
    }

    fn is_running(&self, pid: u32) -> bool {
        if let Some(child) = self.children.lock().get_mut(&pid) {
            return matches!(child.try_wait(), Ok(None))
        }
        process_exists(pid)
    }

    fn terminate(&self, pid: u32) -> Result<bool, SupervisorError> {
        let signalled = terminate_group(pid)?;
        if let Some(mut child) = self.children.lock().remove(&pid) {
            // reap if already gone
            let _ = child.try_wait();
        }
        Ok(signalled)
    }

    fn is_instance_of(&self, pid: u32, program: &str) -> bool {
        if self.children.lock().contains_key(&pid) {
            return true
        }
        process_runs(pid, program)
    }
}

/// Compares the kernel's command name of `pid` with the file name of `program`.
///
/// Processes that are gone, or whose name can't be read, are not rejected.
#[cfg(target_os = "linux")]
fn process_runs(pid: u32, program: &str) -> bool {
    // the kernel truncates the command name
    const TASK_COMM_LEN: usize = 15;

    let Some(name) = std::path::Path::new(program).file_name().and_then(|name| name.to_str()) else {
        return true
    };
    let Ok(comm) = cliquenet_fs_util::read_to_string(format!("/proc/{pid}/comm")) else {
        return true
    };
    let expected = &name.as_bytes()[..name.len().min(TASK_COMM_LEN)];
    comm.trim_end_matches('\n').as_bytes() == expected
}

#[cfg(not(target_os = "linux"))]
fn process_runs(_pid: u32, _program: &str) -> bool {
    true
}

#[cfg(unix)]
fn process_exists(pid: u32) -> bool {
    use nix::{errno::Errno, sys::signal::kill, unistd::Pid};

    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) | Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn process_exists(pid: u32) -> bool {
    Command::new("tasklist")
        .args(["/FI", &format!("PID eq {pid}"), "/NH"])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()))
        .unwrap_or(false)
}

#[cfg(unix)]
fn terminate_group(pid: u32) -> Result<bool, SupervisorError> {
    use nix::{
        errno::Errno,
        sys::signal::{kill, Signal},
        unistd::Pid,
    };

    // negative value == process group id
    let pgid = Pid::from_raw(-(pid as i32));
    match kill(pgid, Signal::SIGTERM) {
        Ok(()) => {
            info!(target: "cliquenet::supervisor", pid, "Sent SIGTERM to process group");
            Ok(true)
        }
        Err(Errno::ESRCH) => {
            debug!(target: "cliquenet::supervisor", pid, "Process group has already exited");
            Ok(false)
        }
        Err(errno) => Err(SupervisorError::Signal { pid, source: errno.into() }),
    }
}

#[cfg(not(unix))]
fn terminate_group(pid: u32) -> Result<bool, SupervisorError> {
    let output = Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .output()
        .map_err(|source| SupervisorError::Signal { pid, source })?;

    if output.status.success() {
        info!(target: "cliquenet::supervisor", pid, "Killed process tree");
        return Ok(true)
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("not found") || stderr.contains("not exist") {
        debug!(target: "cliquenet::supervisor", pid, "Process has already exited");
        return Ok(false)
    }
    Err(SupervisorError::Signal { pid, source: std::io::Error::other(stderr.into_owned()) })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::{thread, time::Duration};

    fn request(dir: &std::path::Path, script: &str, log_path: Option<&str>) -> LaunchRequest {
        cliquenet_tracing::init_test_tracing();
        LaunchRequest {
            label: "test".to_string(),
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            current_dir: dir.to_path_buf(),
            log_path: log_path.map(PathBuf::from),
        }
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        for _ in 0..100 {
            if condition() {
                return true
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn appends_output_to_log() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("console.log"), "previous\n").unwrap();

        let launcher = DetachedLauncher::new();
        let pid =
            launcher.launch(&request(dir.path(), "echo out; echo err >&2", Some("console.log"))).unwrap();
        assert!(wait_until(|| !launcher.is_running(pid)));

        let log = std::fs::read_to_string(dir.path().join("console.log")).unwrap();
        assert!(log.starts_with("previous\n"));
        assert!(log.contains("out"));
        assert!(log.contains("err"));
    }

    #[test]
    fn terminates_running_process() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = DetachedLauncher::new();
        let pid = launcher.launch(&request(dir.path(), "sleep 30", None)).unwrap();
        assert!(launcher.is_running(pid));

        assert!(launcher.terminate(pid).unwrap());
        assert!(wait_until(|| !process_exists(pid) || zombie_or_gone(pid)));
    }

    #[test]
    fn terminating_exited_process_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = DetachedLauncher::new();
        let pid = launcher.launch(&request(dir.path(), "exit 0", None)).unwrap();
        assert!(wait_until(|| !launcher.is_running(pid)));

        assert!(!launcher.terminate(pid).unwrap());
    }

    #[test]
    fn reports_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request(dir.path(), "", None);
        req.program = "cliquenet-missing-binary".to_string();
        assert!(matches!(DetachedLauncher::new().launch(&req), Err(SupervisorError::Spawn { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn recognizes_reused_pid() {
        let mut sleep = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = sleep.id();
        assert!(wait_until(|| process_runs(pid, "sleep")));

        // not launched by this instance, so /proc decides
        let launcher = DetachedLauncher::new();
        assert!(launcher.is_instance_of(pid, "/usr/bin/sleep"));
        assert!(!launcher.is_instance_of(pid, "geth"));
        assert!(!launcher.is_instance_of(pid, "bootnode"));

        sleep.kill().unwrap();
        sleep.wait().unwrap();
        // gone processes are left to `terminate`
        assert!(launcher.is_instance_of(pid, "geth"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn own_children_are_instances() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = DetachedLauncher::new();
        let pid = launcher.launch(&request(dir.path(), "sleep 30", None)).unwrap();
        assert!(launcher.is_instance_of(pid, "anything"));
        launcher.terminate(pid).unwrap();
    }

    /// A terminated child that was reaped by `terminate` is gone, one that was not is a zombie
    /// still visible to `kill(pid, 0)`.
    fn zombie_or_gone(pid: u32) -> bool {
        std::fs::read_to_string(format!("/proc/{pid}/stat"))
            .map(|stat| stat.split_whitespace().nth(2) == Some("Z"))
            .unwrap_or(true)
    }
}
