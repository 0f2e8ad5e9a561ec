#![allow(missing_docs)]

use clap::Parser;
use cliquenet::cli::Cli;

#[tokio::main]
async fn main() {
    if let Err(err) = Cli::parse().run().await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
