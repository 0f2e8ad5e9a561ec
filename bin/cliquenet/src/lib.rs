//! Bootstraps and operates a local clique proof-of-authority network.
//!
//! ```text
//! cliquenet new      # n, create a network and start it
//! cliquenet stop     # s, terminate the network's processes
//! cliquenet restart  # r, start a stopped network again
//! cliquenet delete   # d, terminate and remove everything
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod args;
pub mod cli;
pub mod prompt;
