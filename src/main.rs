mod cli;
mod config;
mod convert;
mod input;
mod knn_cmd;
mod logging;
mod medoid_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Knn(args) => knn_cmd::run(args),
        Command::Medoid(args) => medoid_cmd::run(args),
    }
}
