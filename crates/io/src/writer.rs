//! Per-run report files.
//!
//! Each report is a small text file of `Key,value[,value...]` lines, one
//! file per KNN query and one per medoid search. Reports are rendered to a
//! string first so callers and tests can inspect the exact content.

use std::fmt::Write as _;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use banditnn_search::{MedoidReport, QueryReport, RunSummary};
use banditnn_ucb::Phase;
use tracing::debug;

use crate::error::IoError;

/// File name for the report of KNN query `index`.
pub fn query_report_name(summary: &RunSummary, index: usize) -> String {
    let p = &summary.params;
    format!("n_{}_d_{}_k_{}_index_{index}", p.n, p.d, p.k)
}

/// File name for a medoid report.
pub fn medoid_report_name(summary: &RunSummary) -> String {
    let p = &summary.params;
    format!("medoid_n_{}_d_{}_k_{}", p.n, p.d, p.k)
}

fn push_list<I, T>(out: &mut String, key: &str, items: I)
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    out.push_str(key);
    for item in items {
        // writing into a String cannot fail
        let _ = write!(out, ",{item}");
    }
    out.push('\n');
}

fn push_head(out: &mut String, summary: &RunSummary) {
    let p = &summary.params;
    let t = &summary.timer;
    let _ = writeln!(out, "AveragePulls,{}", summary.average_pulls);
    let _ = writeln!(out, "InitTime,{}", t.millis(Phase::Init));
    let _ = writeln!(out, "RunTime,{}", t.millis(Phase::Run));
    let _ = writeln!(out, "ExtractTime,{}", t.millis(Phase::Extract));
    if summary.verification.is_some() {
        let _ = writeln!(out, "BruteTime,{}", t.millis(Phase::Brute));
    }
    let _ = writeln!(out, "NumberOfInitialPulls,{}", p.initial_pulls);
    let _ = writeln!(out, "Delta,{}", p.delta);
    let _ = writeln!(out, "SampleSize,{}", p.sample_size);
    let _ = writeln!(out, "n,{}", p.n);
    let _ = writeln!(out, "d,{}", p.d);
    let _ = writeln!(out, "k,{}", p.k);
    let _ = writeln!(out, "Status,{}", summary.status);
}

fn push_tail(out: &mut String, summary: &RunSummary) {
    push_list(out, "Answer", summary.window_ids());
    push_list(out, "Position", &summary.position);
    // the excluded self candidate leaves an empty field
    push_list(
        out,
        "AllPullsNumber",
        summary
            .pulls_by_candidate
            .iter()
            .map(|p| p.map(|v| v.to_string()).unwrap_or_default()),
    );
    push_list(
        out,
        "AllPullsIndex",
        summary
            .rank_by_candidate
            .iter()
            .map(|r| r.map(|v| v.to_string()).unwrap_or_default()),
    );
    if let Some(verdict) = summary.verdict() {
        let _ = writeln!(out, "Verdict,{}", u8::from(verdict));
    }
}

/// Per-arm table of the reporting window, one line per column, ranked order.
fn push_window(out: &mut String, summary: &RunSummary) {
    let w = &summary.window;
    push_list(out, "WindowTrueMean", w.iter().map(|e| e.true_mean));
    push_list(out, "WindowEstimate", w.iter().map(|e| e.estimate));
    push_list(out, "WindowLcb", w.iter().map(|e| e.lcb));
    push_list(out, "WindowUcb", w.iter().map(|e| e.ucb));
    push_list(out, "WindowPulls", w.iter().map(|e| e.pulls));
}

/// Renders the report text for one KNN query.
pub fn render_query_report(report: &QueryReport) -> String {
    let mut out = String::new();
    push_head(&mut out, &report.summary);
    push_tail(&mut out, &report.summary);
    out
}

/// Renders the report text for a medoid search.
pub fn render_medoid_report(report: &MedoidReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    push_head(&mut out, summary);
    let _ = writeln!(out, "Sigma,{}", summary.sigma);
    let _ = writeln!(out, "GlobalPulls,{}", summary.global_pulls);
    let _ = writeln!(out, "DistanceEvaluations,{}", report.distance_evaluations);
    push_tail(&mut out, summary);
    push_window(&mut out, summary);
    out
}

fn write_text(dir: &Path, name: &str, text: &str) -> Result<PathBuf, IoError> {
    fs::create_dir_all(dir).map_err(|e| IoError::io(dir, e))?;
    let path = dir.join(name);
    let file = fs::File::create(&path).map_err(|e| IoError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| IoError::io(&path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "wrote report");
    Ok(path)
}

/// Writes the report for one KNN query into `dir`, creating it if needed.
///
/// Existing files are truncated. Returns the path written.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the directory or file cannot be written.
pub fn write_query_report(dir: impl AsRef<Path>, report: &QueryReport) -> Result<PathBuf, IoError> {
    let name = query_report_name(&report.summary, report.query);
    write_text(dir.as_ref(), &name, &render_query_report(report))
}

/// Writes a medoid report into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the directory or file cannot be written.
pub fn write_medoid_report(
    dir: impl AsRef<Path>,
    report: &MedoidReport,
) -> Result<PathBuf, IoError> {
    let name = medoid_report_name(&report.summary);
    write_text(dir.as_ref(), &name, &render_medoid_report(report))
}
