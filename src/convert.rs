//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use banditnn_io::Orientation;
use banditnn_point::Metric;
use banditnn_search::SearchConfig;
use banditnn_ucb::{PullBudget, UcbConfig};

use crate::config::{BanditToml, InputToml, KnnToml, MedoidToml};

/// Supported point-set file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// One dense point per CSV line.
    DenseCsv,
    /// Sparse Matrix Market coordinate file.
    MatrixMarket(Orientation),
}

/// Parses a metric name into the corresponding enum variant.
pub fn parse_metric(s: &str) -> Result<Metric> {
    match s.to_lowercase().as_str() {
        "squared-euclidean" | "sqeuclidean" => Ok(Metric::SquaredEuclidean),
        "euclidean" | "l2" => Ok(Metric::Euclidean),
        "manhattan" | "l1" => Ok(Metric::Manhattan),
        other => bail!("unknown metric: {other:?}"),
    }
}

/// Parses a sparse matrix orientation name.
pub fn parse_orientation(s: &str) -> Result<Orientation> {
    match s.to_lowercase().as_str() {
        "columns" => Ok(Orientation::Columns),
        "rows" => Ok(Orientation::Rows),
        other => bail!("unknown orientation: {other:?}"),
    }
}

/// Resolves the `[input]` table into a file format.
pub fn parse_format(input: &InputToml) -> Result<InputFormat> {
    match input.format.to_lowercase().as_str() {
        "dense-csv" | "csv" => Ok(InputFormat::DenseCsv),
        "matrix-market" | "mtx" => Ok(InputFormat::MatrixMarket(parse_orientation(
            &input.orientation,
        )?)),
        other => bail!("unknown input format: {other:?}"),
    }
}

/// Builds the engine configuration shared by both searches.
fn build_ucb_config(bandit: &BanditToml, k: usize, budget_factor: u64) -> UcbConfig {
    UcbConfig::new(k)
        .with_delta(bandit.delta)
        .with_initial_pulls(bandit.initial_pulls)
        .with_sample_size(bandit.sample_size)
        .with_budget(PullBudget::PerArm(budget_factor))
        .with_margin_factor(bandit.margin_factor)
        .with_extraction_pulls(bandit.extraction_pulls)
}

/// Builds a [`SearchConfig`] for the `knn` command.
///
/// An optional global seed is forwarded to the arm RNGs.
pub fn build_knn_config(
    bandit: &BanditToml,
    knn: &KnnToml,
    seed: Option<u64>,
) -> Result<SearchConfig> {
    let metric = parse_metric(&bandit.metric)?;
    let ucb = build_ucb_config(bandit, bandit.k, bandit.budget_factor);
    ucb.validate()?;
    Ok(SearchConfig::new(ucb)
        .with_metric(metric)
        .with_seed(seed.unwrap_or_default())
        .with_verify(knn.verify)
        .with_threads(knn.threads))
}

/// Builds a [`SearchConfig`] for the `medoid` command.
///
/// `[medoid] top` replaces `[bandit] k` and the medoid budget factor applies.
pub fn build_medoid_config(
    bandit: &BanditToml,
    medoid: &MedoidToml,
    seed: Option<u64>,
) -> Result<SearchConfig> {
    let metric = parse_metric(&bandit.metric)?;
    let ucb = build_ucb_config(bandit, medoid.top, medoid.budget_factor);
    ucb.validate()?;
    Ok(SearchConfig::new(ucb)
        .with_metric(metric)
        .with_seed(seed.unwrap_or_default())
        .with_verify(medoid.verify)
        .with_threads(medoid.threads))
}

/// Parses a comma-separated query list such as `0,4,9`.
pub fn parse_query_list(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| anyhow::anyhow!("invalid query index: {t:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BanditnnConfig;

    #[test]
    fn metric_names() {
        assert_eq!(parse_metric("Euclidean").unwrap(), Metric::Euclidean);
        assert_eq!(parse_metric("l1").unwrap(), Metric::Manhattan);
        assert_eq!(
            parse_metric("squared-euclidean").unwrap(),
            Metric::SquaredEuclidean
        );
        assert!(parse_metric("cosine").is_err());
    }

    #[test]
    fn metric_names_round_trip_through_name() {
        for metric in [Metric::SquaredEuclidean, Metric::Euclidean, Metric::Manhattan] {
            assert_eq!(parse_metric(metric.name()).unwrap(), metric);
        }
    }

    #[test]
    fn input_formats() {
        let mut input = InputToml::default();
        assert_eq!(parse_format(&input).unwrap(), InputFormat::DenseCsv);

        input.format = "matrix-market".to_string();
        input.orientation = "rows".to_string();
        assert_eq!(
            parse_format(&input).unwrap(),
            InputFormat::MatrixMarket(Orientation::Rows)
        );

        input.orientation = "diagonal".to_string();
        assert!(parse_format(&input).is_err());

        input.format = "parquet".to_string();
        assert!(parse_format(&input).is_err());
    }

    #[test]
    fn knn_config_from_defaults() {
        let config = BanditnnConfig::default();
        let search = build_knn_config(&config.bandit, &config.knn, Some(9)).unwrap();
        assert_eq!(search.ucb().k(), 5);
        assert_eq!(search.ucb().initial_pulls(), 16);
        assert_eq!(search.ucb().budget(), PullBudget::PerArm(20_000));
        assert_eq!(search.ucb().report_len(), 25);
        assert_eq!(search.metric(), Metric::Euclidean);
        assert_eq!(search.seed(), 9);
        assert!(!search.verify());
    }

    #[test]
    fn medoid_config_uses_its_own_k_and_budget() {
        let config = BanditnnConfig::default();
        let search = build_medoid_config(&config.bandit, &config.medoid, None).unwrap();
        assert_eq!(search.ucb().k(), 1);
        assert_eq!(search.ucb().budget(), PullBudget::PerArm(100_000));
        assert_eq!(search.seed(), 0);
    }

    #[test]
    fn invalid_engine_parameters_rejected() {
        let mut config = BanditnnConfig::default();
        config.bandit.delta = 1.5;
        assert!(build_knn_config(&config.bandit, &config.knn, None).is_err());

        let mut config = BanditnnConfig::default();
        config.medoid.top = 0;
        assert!(build_medoid_config(&config.bandit, &config.medoid, None).is_err());
    }

    #[test]
    fn query_lists() {
        assert_eq!(parse_query_list("0, 4,9").unwrap(), vec![0, 4, 9]);
        assert_eq!(parse_query_list("").unwrap(), Vec::<usize>::new());
        assert!(parse_query_list("1,x").is_err());
    }
}
