//! Raw point dump: one CSV row per parsed metric point.

use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use crate::ingest::ParsedRun;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column names are fixed; configured tag keys only choose which tags fill
/// the last two columns.
const HEADER: &str = "timestamp,metric,value,scenario,productId";

/// Write every point as a CSV row. Returns the number of data rows.
pub fn write_csv<W: Write>(
    out: &mut W,
    run: &ParsedRun,
    config: &AnalyzeConfig,
) -> io::Result<usize> {
    let scenario_key = &config.tags.scenario;
    let product_key = &config.tags.product;

    writeln!(out, "{HEADER}")?;

    let mut rows = 0;
    for series in run.metrics.iter() {
        let metric = escape_csv(&series.name);
        for point in &series.points {
            let tag = |key: &str| {
                point
                    .tags
                    .get(key)
                    .map(|v| escape_csv(v))
                    .unwrap_or_default()
            };
            writeln!(
                out,
                "{},{},{},{},{}",
                escape_csv(point.time.as_deref().unwrap_or("")),
                metric,
                point.value,
                tag(scenario_key),
                tag(product_key),
            )?;
            rows += 1;
        }
    }
    Ok(rows)
}

/// Write the CSV dump to `path`, replacing any existing file.
pub fn write_csv_file(
    path: &Path,
    run: &ParsedRun,
    config: &AnalyzeConfig,
) -> Result<usize, AnalyzeError> {
    let write_err = |e| AnalyzeError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    let file = std::fs::File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(file);
    let rows = write_csv(&mut out, run, config).map_err(write_err)?;
    out.flush().map_err(write_err)?;

    tracing::info!(path = %path.display(), rows, "wrote CSV report");
    Ok(rows)
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
