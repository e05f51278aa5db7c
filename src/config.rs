use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::CommonArgs;

/// Top-level banditnn configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BanditnnConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Point-set input.
    #[serde(default)]
    pub input: InputToml,

    /// Report output.
    #[serde(default)]
    pub output: OutputToml,

    /// Engine settings shared by both searches.
    #[serde(default)]
    pub bandit: BanditToml,

    /// KNN settings.
    #[serde(default)]
    pub knn: KnnToml,

    /// Medoid settings.
    #[serde(default)]
    pub medoid: MedoidToml,
}

impl BanditnnConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Loads the file named on the command line and applies CLI overrides.
    ///
    /// A missing file is only an error when no `--input` is given, so a run
    /// can be configured entirely from flags and defaults.
    pub fn from_args(args: &CommonArgs) -> Result<Self> {
        let mut config = if args.config.exists() || args.input.is_none() {
            Self::load(&args.config)?
        } else {
            Self::default()
        };
        if let Some(ref input) = args.input {
            config.input.path = Some(input.clone());
        }
        if let Some(ref dir) = args.output {
            config.output.dir = dir.clone();
        }
        if args.seed.is_some() {
            config.seed = args.seed;
        }
        if args.verify {
            config.knn.verify = true;
            config.medoid.verify = true;
        }
        Ok(config)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputToml {
    pub path: Option<PathBuf>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_orientation")]
    pub orientation: String,
}

impl Default for InputToml {
    fn default() -> Self {
        Self {
            path: None,
            format: default_format(),
            orientation: default_orientation(),
        }
    }
}

fn default_format() -> String {
    "dense-csv".to_string()
}
fn default_orientation() -> String {
    "columns".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BanditToml {
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_initial_pulls")]
    pub initial_pulls: usize,
    #[serde(default = "default_delta")]
    pub delta: f64,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_knn_budget_factor")]
    pub budget_factor: u64,
    #[serde(default = "default_margin_factor")]
    pub margin_factor: usize,
    #[serde(default)]
    pub extraction_pulls: usize,
}

impl Default for BanditToml {
    fn default() -> Self {
        Self {
            k: default_k(),
            initial_pulls: default_initial_pulls(),
            delta: default_delta(),
            sample_size: default_sample_size(),
            metric: default_metric(),
            budget_factor: default_knn_budget_factor(),
            margin_factor: default_margin_factor(),
            extraction_pulls: 0,
        }
    }
}

fn default_k() -> usize {
    5
}
fn default_initial_pulls() -> usize {
    16
}
fn default_delta() -> f64 {
    0.01
}
fn default_sample_size() -> usize {
    16
}
fn default_metric() -> String {
    "euclidean".to_string()
}
fn default_knn_budget_factor() -> u64 {
    20_000
}
fn default_margin_factor() -> usize {
    4
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct KnnToml {
    /// Query indices; all points when absent.
    #[serde(default)]
    pub queries: Option<Vec<usize>>,
    #[serde(default)]
    pub verify: bool,
    #[serde(default)]
    pub threads: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MedoidToml {
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default = "default_medoid_budget_factor")]
    pub budget_factor: u64,
    #[serde(default)]
    pub verify: bool,
    #[serde(default)]
    pub threads: usize,
}

impl Default for MedoidToml {
    fn default() -> Self {
        Self {
            top: default_top(),
            budget_factor: default_medoid_budget_factor(),
            verify: false,
            threads: 0,
        }
    }
}

fn default_top() -> usize {
    1
}
fn default_medoid_budget_factor() -> u64 {
    100_000
}
