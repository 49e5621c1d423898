/// JSONL ingestion: parse a k6 `--out json` results file into per-metric
/// series and per-scenario / per-product request duration groups.
use crate::config::AnalyzeConfig;
use crate::error::AnalyzeError;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;

/// One observation of a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub value: f64,
    pub time: Option<String>,
    pub tags: BTreeMap<String, String>,
}

/// All points recorded for one metric name, in input order.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    pub name: String,
    pub points: Vec<MetricPoint>,
}

impl MetricSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Metric series keyed by name, iterated in first-seen order.
#[derive(Debug, Default)]
pub struct MetricSet {
    series: Vec<MetricSeries>,
    index: HashMap<String, usize>,
}

impl MetricSet {
    pub fn push(&mut self, name: &str, point: MetricPoint) {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.series.push(MetricSeries {
                    name: name.to_string(),
                    points: Vec::new(),
                });
                self.index.insert(name.to_string(), self.series.len() - 1);
                self.series.len() - 1
            }
        };
        self.series[idx].points.push(point);
    }

    pub fn get(&self, name: &str) -> Option<&MetricSeries> {
        self.index.get(name).map(|&idx| &self.series[idx])
    }

    /// Points recorded under `name`; empty when the metric never appeared.
    pub fn points(&self, name: &str) -> &[MetricPoint] {
        self.get(name).map(|s| s.points.as_slice()).unwrap_or(&[])
    }

    pub fn values(&self, name: &str) -> Vec<f64> {
        self.get(name).map(MetricSeries::values).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Request durations collected for one scenario or product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSeries {
    pub durations: Vec<f64>,
    pub count: u64,
    /// Position of this group's key in input order, starting at 0.
    pub first_seen: usize,
}

impl GroupedSeries {
    fn record(&mut self, value: f64) {
        self.durations.push(value);
        self.count += 1;
    }
}

/// Everything extracted from one results file.
#[derive(Debug, Default)]
pub struct ParsedRun {
    pub metrics: MetricSet,
    pub scenarios: BTreeMap<String, GroupedSeries>,
    pub products: BTreeMap<String, GroupedSeries>,
}

/// Parse a k6 JSONL results file.
pub fn parse_file(path: &Path, config: &AnalyzeConfig) -> Result<ParsedRun, AnalyzeError> {
    let read_err = |e| AnalyzeError::Read {
        path: path.to_path_buf(),
        source: e,
    };
    let file = std::fs::File::open(path).map_err(read_err)?;
    let reader = std::io::BufReader::new(file);

    tracing::info!(path = %path.display(), "parsing k6 results");
    let run = parse_reader(reader, config).map_err(read_err)?;
    if run.metrics.is_empty() {
        tracing::warn!(path = %path.display(), "no Point records found");
    }
    tracing::info!(
        points = run.metrics.total_points(),
        metrics = run.metrics.len(),
        scenarios = run.scenarios.len(),
        products = run.products.len(),
        "parsed k6 results"
    );

    Ok(run)
}

/// Parse JSONL from any buffered reader. Lines that are not valid UTF-8 or
/// JSON, and records that are not `Point`s, are skipped. Only failures of
/// the reader itself are returned.
pub fn parse_reader<R: BufRead>(
    reader: R,
    config: &AnalyzeConfig,
) -> std::io::Result<ParsedRun> {
    let mut run = ParsedRun::default();

    for line in reader.split(b'\n') {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let v: Value = match serde_json::from_slice(&line) {
            Ok(v) => v,
            Err(_) => continue, // skip malformed lines
        };

        if v.get("type").and_then(|t| t.as_str()) != Some("Point") {
            continue;
        }
        let Some((metric, point)) = extract_point(&v) else {
            continue;
        };
        record_point(&mut run, config, metric, point);
    }

    Ok(run)
}

fn extract_point(v: &Value) -> Option<(&str, MetricPoint)> {
    let metric = v.get("metric").and_then(|m| m.as_str())?;
    let data = v.get("data").and_then(|d| d.as_object())?;

    let value = data.get("value").and_then(|n| n.as_f64()).unwrap_or(0.0);
    let time = data
        .get("time")
        .and_then(|t| t.as_str())
        .map(str::to_string);

    let mut tags = BTreeMap::new();
    if let Some(obj) = data.get("tags").and_then(|t| t.as_object()) {
        for (key, val) in obj {
            let val = match val {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            tags.insert(key.clone(), val);
        }
    }

    Some((metric, MetricPoint { value, time, tags }))
}

fn record_point(run: &mut ParsedRun, config: &AnalyzeConfig, metric: &str, point: MetricPoint) {
    if metric == config.metrics.duration {
        if let Some(scenario) = non_empty_tag(&point, &config.tags.scenario) {
            group_entry(&mut run.scenarios, scenario).record(point.value);
        }
        if let Some(product) = non_empty_tag(&point, &config.tags.product) {
            group_entry(&mut run.products, product).record(point.value);
        }
    }

    run.metrics.push(metric, point);
}

fn group_entry<'a>(
    groups: &'a mut BTreeMap<String, GroupedSeries>,
    key: &str,
) -> &'a mut GroupedSeries {
    let next = groups.len();
    groups
        .entry(key.to_string())
        .or_insert_with(|| GroupedSeries {
            first_seen: next,
            ..Default::default()
        })
}

fn non_empty_tag<'a>(point: &'a MetricPoint, key: &str) -> Option<&'a str> {
    point
        .tags
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
