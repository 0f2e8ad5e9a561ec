//! In-memory stand-ins for the external `geth` and `bootnode` executables.

use alloy_primitives::{hex, Address};
use async_trait::async_trait;
use cliquenet_supervisor::{
    CommandError, CommandOutput, CommandRunner, Invocation, LaunchRequest, ProcessLauncher,
    SupervisorError,
};
use parking_lot::Mutex;
use std::{collections::BTreeSet, path::PathBuf};

/// Emulates `geth account new` and `geth init` by writing what they would leave behind.
///
/// The account of `node{i}` has the address `Address::with_last_byte(i)`.
#[derive(Debug, Default)]
pub(crate) struct FakeRunner {
    invocations: Mutex<Vec<Invocation>>,
    fail_on: Option<String>,
    skip_keystore: bool,
}

impl FakeRunner {
    /// Fails every command with the given subcommand.
    pub(crate) fn failing(subcommand: &str) -> Self {
        Self { fail_on: Some(subcommand.to_string()), ..Default::default() }
    }

    /// Account generation succeeds without writing a keystore file.
    pub(crate) fn without_keystore() -> Self {
        Self { skip_keystore: true, ..Default::default() }
    }

    /// Command lines run so far.
    pub(crate) fn commands(&self) -> Vec<String> {
        self.invocations.lock().iter().map(ToString::to_string).collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        self.invocations.lock().push(invocation.clone());

        let has = |arg: &str| invocation.args.iter().any(|a| a == arg);
        if self.fail_on.as_deref().is_some_and(has) {
            return Err(CommandError::ExitStatus {
                command: invocation.to_string(),
                code: Some(1),
                stderr: "Fatal: failed".to_string(),
            })
        }

        let datadir = datadir(invocation);
        if has("account") && !self.skip_keystore {
            let index: u8 = datadir
                .trim_end_matches('/')
                .trim_start_matches("node")
                .parse()
                .expect("node datadir");
            let address = Address::with_last_byte(index);
            let keystore = invocation.current_dir.join(&datadir).join("keystore");
            std::fs::create_dir_all(&keystore).unwrap();
            std::fs::write(
                keystore.join(format!("UTC--2019-07-13T09-00-00.000000000Z--{}", hex::encode(address))),
                format!(r#"{{"address":"{}","crypto":{{}},"version":3}}"#, hex::encode(address)),
            )
            .unwrap();
        } else if has("init") {
            std::fs::create_dir_all(invocation.current_dir.join(&datadir).join("geth")).unwrap();
        }

        Ok(CommandOutput::default())
    }
}

fn datadir(invocation: &Invocation) -> String {
    let idx = invocation.args.iter().position(|arg| arg == "--datadir").expect("--datadir");
    invocation.args[idx + 1].clone()
}

/// Records launches and pretends the processes run until terminated.
#[derive(Debug)]
pub(crate) struct FakeLauncher {
    launched: Mutex<Vec<LaunchRequest>>,
    running: Mutex<BTreeSet<u32>>,
    terminated: Mutex<Vec<u32>>,
    next_pid: Mutex<u32>,
    /// Processes with this label exit immediately.
    exiting: Option<String>,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self {
            launched: Default::default(),
            running: Default::default(),
            terminated: Default::default(),
            next_pid: Mutex::new(1000),
            exiting: None,
        }
    }
}

impl FakeLauncher {
    /// Processes launched with `label` exit right away.
    pub(crate) fn exiting(label: &str) -> Self {
        Self { exiting: Some(label.to_string()), ..Default::default() }
    }

    pub(crate) fn launched(&self) -> Vec<LaunchRequest> {
        self.launched.lock().clone()
    }

    pub(crate) fn running(&self) -> Vec<u32> {
        self.running.lock().iter().copied().collect()
    }

    pub(crate) fn terminated(&self) -> Vec<u32> {
        self.terminated.lock().clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<u32, SupervisorError> {
        if let Some(log_path) = &request.log_path {
            let path: PathBuf = request.current_dir.join(log_path);
            cliquenet_fs_util::open_append(path)?;
        }

        let pid = {
            let mut next = self.next_pid.lock();
            *next += 1;
            *next
        };
        self.launched.lock().push(request.clone());
        if self.exiting.as_deref() != Some(request.label.as_str()) {
            self.running.lock().insert(pid);
        }
        Ok(pid)
    }

    fn is_running(&self, pid: u32) -> bool {
        self.running.lock().contains(&pid)
    }

    fn terminate(&self, pid: u32) -> Result<bool, SupervisorError> {
        let was_running = self.running.lock().remove(&pid);
        if was_running {
            self.terminated.lock().push(pid);
        }
        Ok(was_running)
    }
}
