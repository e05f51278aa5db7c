//! Point-set readers.

use std::fs;
use std::path::Path;

use banditnn_point::{DensePoint, PointSet, SparsePoint};
use tracing::info;

use crate::error::IoError;

/// Which axis of a sparse matrix holds the points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    /// One point per column (genes × cells layout).
    #[default]
    Columns,
    /// One point per row.
    Rows,
}

fn read_to_string(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|e| IoError::io(path, e))
}

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> IoError {
    IoError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

/// Reads one dense point per line of comma-separated floats.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Io`] | the file cannot be read |
/// | [`IoError::Parse`] | a field is not a float |
/// | [`IoError::Point`] | rows are empty, ragged, or non-finite |
pub fn read_dense_csv(path: impl AsRef<Path>) -> Result<PointSet<DensePoint>, IoError> {
    let path = path.as_ref();
    let text = read_to_string(path)?;
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split(',')
            .map(|field| {
                let field = field.trim();
                field
                    .parse::<f64>()
                    .map_err(|_| parse_error(path, i + 1, format!("invalid float '{field}'")))
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }
    let set = PointSet::from_rows(rows)?;
    info!(
        path = %path.display(),
        points = set.len(),
        dim = set.dim(),
        "read dense csv"
    );
    Ok(set)
}

/// Reads a Matrix Market coordinate file into sparse points.
///
/// Accepts `real`, `integer` and `pattern` fields with `general` symmetry.
/// Indices are 1-based; `pattern` entries get the value 1.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Header`] | missing or unsupported banner, missing size line |
/// | [`IoError::Parse`] | malformed entry, index out of range, wrong entry count |
/// | [`IoError::Point`] | duplicate entries or an empty matrix |
pub fn read_matrix_market(
    path: impl AsRef<Path>,
    orientation: Orientation,
) -> Result<PointSet<SparsePoint>, IoError> {
    let path = path.as_ref();
    let text = read_to_string(path)?;
    let mut lines = text.lines().enumerate();

    let header = |reason: &str| IoError::Header {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let banner = lines
        .next()
        .map(|(_, l)| l.to_ascii_lowercase())
        .ok_or_else(|| header("empty file"))?;
    let tokens: Vec<&str> = banner.split_whitespace().collect();
    if tokens.first() != Some(&"%%matrixmarket") {
        return Err(header("missing %%MatrixMarket banner"));
    }
    if tokens.get(1) != Some(&"matrix") || tokens.get(2) != Some(&"coordinate") {
        return Err(header("only 'matrix coordinate' files are supported"));
    }
    let pattern = match tokens.get(3).copied() {
        Some("real" | "integer") => false,
        Some("pattern") => true,
        _ => return Err(header("field must be real, integer or pattern")),
    };
    if tokens.get(4).is_some_and(|&s| s != "general") {
        return Err(header("only general symmetry is supported"));
    }

    let mut data = lines.filter(|(_, l)| {
        let l = l.trim();
        !l.is_empty() && !l.starts_with('%')
    });

    let (size_no, size_line) = data.next().ok_or_else(|| header("missing size line"))?;
    let size: Vec<usize> = size_line
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|_| parse_error(path, size_no + 1, "size line must be 'rows cols nnz'"))?;
    let [rows, cols, nnz] = size[..] else {
        return Err(parse_error(path, size_no + 1, "size line must be 'rows cols nnz'"));
    };

    let (n_points, dim) = match orientation {
        Orientation::Columns => (cols, rows),
        Orientation::Rows => (rows, cols),
    };
    let mut entries: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n_points];
    let mut seen = 0usize;
    for (i, line) in data {
        let line_no = i + 1;
        let mut fields = line.split_whitespace();
        let mut index = |name: &str, bound: usize| -> Result<usize, IoError> {
            let raw = fields
                .next()
                .ok_or_else(|| parse_error(path, line_no, format!("missing {name}")))?;
            let one_based: usize = raw
                .parse()
                .map_err(|_| parse_error(path, line_no, format!("invalid {name} '{raw}'")))?;
            if one_based == 0 || one_based > bound {
                return Err(parse_error(
                    path,
                    line_no,
                    format!("{name} {one_based} outside 1..={bound}"),
                ));
            }
            Ok(one_based - 1)
        };
        let r = index("row", rows)?;
        let c = index("column", cols)?;
        let value = if pattern {
            1.0
        } else {
            let raw = fields
                .next()
                .ok_or_else(|| parse_error(path, line_no, "missing value"))?;
            raw.parse::<f64>()
                .map_err(|_| parse_error(path, line_no, format!("invalid value '{raw}'")))?
        };
        let (point, coord) = match orientation {
            Orientation::Columns => (c, r),
            Orientation::Rows => (r, c),
        };
        entries[point].push((coord, value));
        seen += 1;
    }
    if seen != nnz {
        return Err(parse_error(
            path,
            text.lines().count(),
            format!("expected {nnz} entries, found {seen}"),
        ));
    }

    let points = entries
        .into_iter()
        .map(|e| SparsePoint::new(dim, e))
        .collect::<Result<Vec<_>, _>>()?;
    let set = PointSet::new(points)?;
    info!(
        path = %path.display(),
        points = set.len(),
        dim = set.dim(),
        nnz,
        sparsity = set.mean_sparsity(),
        "read matrix market"
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = read_dense_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn test_orientation_default_is_columns() {
        assert_eq!(Orientation::default(), Orientation::Columns);
    }
}
