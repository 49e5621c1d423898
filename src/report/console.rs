//! Plain-text report printed to stdout after every run.

use super::{format_count, products_in_order, scenarios_in_order};
use crate::config::AnalyzeConfig;
use crate::ingest::{GroupedSeries, ParsedRun};
use crate::stats::{self, Stats};
use chrono::{DateTime, FixedOffset};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

/// Run-level figures derived from the parsed metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub duration_secs: f64,
    pub total_requests: usize,
    pub failed_requests: usize,
    pub errors: usize,
    /// Requests per second over the observed span.
    pub tps: f64,
    /// Errors as a percentage of requests.
    pub error_rate: f64,
    /// Failed requests as a percentage of requests.
    pub failed_rate: f64,
}

impl Summary {
    pub fn derive(run: &ParsedRun, config: &AnalyzeConfig) -> Self {
        let names = &config.metrics;

        let times: Vec<DateTime<FixedOffset>> = run
            .metrics
            .points(&names.duration)
            .iter()
            .filter_map(|p| p.time.as_deref())
            .filter_map(|t| DateTime::parse_from_rfc3339(t).ok())
            .collect();
        let start = times.iter().min().copied();
        let end = times.iter().max().copied();
        let duration_secs = match (start, end) {
            (Some(s), Some(e)) => (e - s).num_microseconds().unwrap_or(0) as f64 / 1e6,
            _ => 0.0,
        };

        let total_requests = run.metrics.points(&names.requests).len();
        let failed_requests = count_ones(run, &names.failed);
        let errors = count_ones(run, &names.errors);

        let tps = if duration_secs > 0.0 {
            total_requests as f64 / duration_secs
        } else {
            0.0
        };
        let (error_rate, failed_rate) = if total_requests > 0 {
            (
                errors as f64 / total_requests as f64 * 100.0,
                failed_requests as f64 / total_requests as f64 * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        Summary {
            start,
            end,
            duration_secs,
            total_requests,
            failed_requests,
            errors,
            tps,
            error_rate,
            failed_rate,
        }
    }
}

fn count_ones(run: &ParsedRun, metric: &str) -> usize {
    run.metrics
        .points(metric)
        .iter()
        .filter(|p| p.value == 1.0)
        .count()
}

/// Write the full console report.
pub fn write_report<W: Write>(
    out: &mut W,
    run: &ParsedRun,
    config: &AnalyzeConfig,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(RULE_WIDTH);

    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{:^width$}", config.report.title, width = RULE_WIDTH)?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;

    let summary = Summary::derive(run, config);
    write_overall(out, &summary, &thin)?;

    if let Some(s) = stats::stats(&run.metrics.values(&config.metrics.duration)) {
        writeln!(out, "HTTP request duration ({})", config.metrics.duration)?;
        writeln!(out, "{thin}")?;
        writeln!(out, "{:15} {:>12} {:>8}", "", "value", "unit")?;
        for (label, value) in [
            ("avg", s.avg),
            ("median", s.median),
            ("min", s.min),
            ("max", s.max),
            ("P90", s.p90),
            ("P95", s.p95),
            ("P99", s.p99),
        ] {
            writeln!(out, "{label:15} {value:>12.2} {:>8}", "ms")?;
        }
        writeln!(out)?;
    }

    if let Some(s) = stats::stats(&run.metrics.values(&config.metrics.waiting)) {
        writeln!(out, "HTTP waiting time ({})", config.metrics.waiting)?;
        writeln!(out, "{thin}")?;
        writeln!(out, "avg: {:.2}ms", s.avg)?;
        writeln!(out, "P95: {:.2}ms", s.p95)?;
        writeln!(out, "P99: {:.2}ms", s.p99)?;
        writeln!(out)?;
    }

    if !run.scenarios.is_empty() {
        writeln!(out, "Response time by scenario")?;
        write_group_table(
            out,
            "scenario",
            20,
            &scenarios_in_order(&run.scenarios),
            &thin,
        )?;
    }

    if !run.products.is_empty() {
        writeln!(out, "Response time by product")?;
        write_group_table(
            out,
            "product id",
            10,
            &products_in_order(&run.products),
            &thin,
        )?;
    }

    writeln!(out, "{rule}")?;
    writeln!(out)?;
    Ok(())
}

fn write_overall<W: Write>(out: &mut W, s: &Summary, thin: &str) -> io::Result<()> {
    writeln!(out, "Overall")?;
    writeln!(out, "{thin}")?;
    writeln!(out, "Test start: {}", format_time(s.start))?;
    writeln!(out, "Test end: {}", format_time(s.end))?;
    writeln!(
        out,
        "Total duration: {:.2}s ({:.2}min)",
        s.duration_secs,
        s.duration_secs / 60.0
    )?;
    writeln!(out, "Total requests: {}", format_count(s.total_requests))?;
    if s.total_requests > 0 {
        writeln!(
            out,
            "Failed requests: {} ({:.2}%)",
            s.failed_requests, s.failed_rate
        )?;
    } else {
        writeln!(out, "Failed requests: 0")?;
    }
    writeln!(out, "Errors: {} ({:.2}%)", s.errors, s.error_rate)?;
    writeln!(out, "TPS (requests/sec): {:.2}", s.tps)?;
    writeln!(out)?;
    Ok(())
}

fn write_group_table<W: Write>(
    out: &mut W,
    key_label: &str,
    key_width: usize,
    groups: &[(&str, &GroupedSeries)],
    thin: &str,
) -> io::Result<()> {
    writeln!(out, "{thin}")?;
    writeln!(
        out,
        "{:<kw$} {:>10} {:>12} {:>12} {:>12}",
        key_label,
        "requests",
        "avg(ms)",
        "P95(ms)",
        "P99(ms)",
        kw = key_width
    )?;
    writeln!(out, "{thin}")?;
    for (key, group) in groups {
        let Some(s) = stats::stats(&group.durations) else {
            continue;
        };
        write_group_row(out, key, key_width, group.count, &s)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_group_row<W: Write>(
    out: &mut W,
    key: &str,
    key_width: usize,
    count: u64,
    s: &Stats,
) -> io::Result<()> {
    writeln!(
        out,
        "{:<kw$} {:>10} {:>12.2} {:>12.2} {:>12.2}",
        key,
        format_count(count),
        s.avg,
        s.p95,
        s.p99,
        kw = key_width
    )
}

fn format_time(t: Option<DateTime<FixedOffset>>) -> String {
    match t {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "n/a".to_string(),
    }
}
