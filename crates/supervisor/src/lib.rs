//! External command execution and detached process supervision.
//!
//! Two capabilities are exposed as traits so they can be replaced in tests:
//!
//! - [`CommandRunner`]: runs a command to completion, e.g. `geth init`.
//! - [`ProcessLauncher`]: starts a long running process in its own process group and later
//!   terminates that group.
//!
//! Launched processes are recorded in a [`ProcessRegistry`], which is persisted and used to
//! terminate exactly the processes that were started, never processes matched by name.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod command;
mod error;
mod process;
mod registry;

pub use command::{CommandOutput, CommandRunner, Invocation, SystemCommandRunner};
pub use error::{CommandError, SupervisorError};
pub use process::{DetachedLauncher, LaunchRequest, ProcessLauncher};
pub use registry::{ProcessEntry, ProcessRegistry};
