use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Adaptive-sampling nearest-neighbour and medoid search.
#[derive(Parser)]
#[command(
    name = "banditnn",
    version,
    about = "Adaptive-sampling k-nearest-neighbour and medoid search"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Find the k nearest neighbours of each query point.
    Knn(KnnArgs),
    /// Find the most central points of the set.
    Medoid(MedoidArgs),
}

/// Options shared by both subcommands.
#[derive(clap::Args)]
pub struct CommonArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "banditnn.toml")]
    pub config: PathBuf,

    /// Override input point file from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override report directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Verify every answer against brute force.
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for the `knn` subcommand.
#[derive(clap::Args)]
pub struct KnnArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Comma-separated query indices, e.g. `0,4,9`. Overrides `[knn] queries`.
    #[arg(short, long)]
    pub queries: Option<String>,
}

/// Arguments for the `medoid` subcommand.
#[derive(clap::Args)]
pub struct MedoidArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}
