//! Loading the configured point set.

use anyhow::{Context, Result, bail};
use tracing::info;

use banditnn_io::{read_dense_csv, read_matrix_market};
use banditnn_point::{DensePoint, PointSet, SparsePoint};

use crate::config::InputToml;
use crate::convert::{self, InputFormat};

/// A point set in whichever representation the input file implies.
pub enum Points {
    Dense(PointSet<DensePoint>),
    Sparse(PointSet<SparsePoint>),
}

impl Points {
    pub fn len(&self) -> usize {
        match self {
            Points::Dense(set) => set.len(),
            Points::Sparse(set) => set.len(),
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            Points::Dense(set) => set.dim(),
            Points::Sparse(set) => set.dim(),
        }
    }
}

/// Reads the point set named by the `[input]` table.
pub fn load(input: &InputToml) -> Result<Points> {
    let Some(path) = input.path.as_ref() else {
        bail!("no input path: set [input].path in config or use --input");
    };
    let format = convert::parse_format(input)?;
    info!(path = %path.display(), ?format, "reading points");
    let points = match format {
        InputFormat::DenseCsv => Points::Dense(
            read_dense_csv(path)
                .with_context(|| format!("failed to read CSV: {}", path.display()))?,
        ),
        InputFormat::MatrixMarket(orientation) => Points::Sparse(
            read_matrix_market(path, orientation)
                .with_context(|| format!("failed to read Matrix Market: {}", path.display()))?,
        ),
    };
    info!(n = points.len(), d = points.dim(), "points loaded");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_reported() {
        let Err(err) = load(&InputToml::default()) else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("no input path"));
    }

    #[test]
    fn loads_dense_and_sparse() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("p.csv");
        std::fs::write(&csv, "0,1\n2,3\n4,5\n").unwrap();
        let input = InputToml {
            path: Some(csv),
            ..InputToml::default()
        };
        let points = load(&input).unwrap();
        assert!(matches!(points, Points::Dense(_)));
        assert_eq!((points.len(), points.dim()), (3, 2));

        let mtx = dir.path().join("m.mtx");
        std::fs::write(
            &mtx,
            "%%MatrixMarket matrix coordinate integer general\n4 2 2\n1 1 3\n4 2 1\n",
        )
        .unwrap();
        let input = InputToml {
            path: Some(mtx),
            format: "matrix-market".to_string(),
            orientation: "columns".to_string(),
        };
        let points = load(&input).unwrap();
        assert!(matches!(points, Points::Sparse(_)));
        assert_eq!((points.len(), points.dim()), (2, 4));
    }
}
